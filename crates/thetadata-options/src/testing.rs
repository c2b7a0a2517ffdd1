use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use thetadata_core::{ErrorCodeEntry, ErrorCodeTable, RawResponse, RequestSpec, Result, Transport};

/// Transport that replays scripted results and records every request it sees.
///
/// Once the script is exhausted it answers `200` with an empty body.
#[derive(Debug, Default)]
pub(crate) struct ScriptedTransport {
    script: Mutex<VecDeque<Result<RawResponse>>>,
    requests: Mutex<Vec<RequestSpec>>,
}

impl ScriptedTransport {
    pub(crate) fn new(script: Vec<Result<RawResponse>>) -> Self {
        Self {
            script: Mutex::new(script.into()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub(crate) fn last_request(&self) -> Option<RequestSpec> {
        self.requests.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn send(&self, request: &RequestSpec) -> Result<RawResponse> {
        self.requests.lock().unwrap().push(request.clone());
        self.script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(RawResponse::new(200, Vec::new())))
    }
}

pub(crate) fn sample_error_codes() -> ErrorCodeTable {
    ErrorCodeTable::from_entries([
        ErrorCodeEntry::new(472, "NO_DATA", "There was no data found for the request."),
        ErrorCodeEntry::new(473, "INVALID_PARAMS", "The request parameters are invalid."),
    ])
}
