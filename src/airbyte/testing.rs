// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::airbyte::traits::{AirbyteError, JobApi};
use async_trait::async_trait;
use serde_json::Value;
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

/// 按端点预设响应的作业 API，记录每次调用
#[derive(Default)]
pub struct ScriptedJobApi {
    responses: Mutex<HashMap<String, VecDeque<Result<Value, AirbyteError>>>>,
    calls: Mutex<Vec<(String, Value)>>,
}

impl ScriptedJobApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// 为端点追加一个响应，按顺序消费，最后一个会被重复使用
    pub fn respond(&self, endpoint: &str, response: Result<Value, AirbyteError>) -> &Self {
        self.responses
            .lock()
            .unwrap()
            .entry(endpoint.to_string())
            .or_default()
            .push_back(response);
        self
    }

    pub fn calls(&self) -> Vec<(String, Value)> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self, endpoint: &str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|(e, _)| e == endpoint)
            .count()
    }

    pub fn last_payload(&self, endpoint: &str) -> Option<Value> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .rev()
            .find(|(e, _)| e == endpoint)
            .map(|(_, payload)| payload.clone())
    }
}

fn clone_result(result: &Result<Value, AirbyteError>) -> Result<Value, AirbyteError> {
    match result {
        Ok(value) => Ok(value.clone()),
        Err(AirbyteError::Validation(m)) => Err(AirbyteError::Validation(m.clone())),
        Err(AirbyteError::Connectivity(m)) => Err(AirbyteError::Connectivity(m.clone())),
        Err(AirbyteError::Status { status, message }) => Err(AirbyteError::Status {
            status: *status,
            message: message.clone(),
        }),
        Err(AirbyteError::Discovery { detail, errors }) => Err(AirbyteError::Discovery {
            detail: detail.clone(),
            errors: errors.clone(),
        }),
        Err(AirbyteError::UnexpectedResponse(m)) => {
            Err(AirbyteError::UnexpectedResponse(m.clone()))
        }
    }
}

#[async_trait]
impl JobApi for ScriptedJobApi {
    async fn request(&self, endpoint: &str, payload: Value) -> Result<Value, AirbyteError> {
        let endpoint = endpoint.trim_start_matches('/').to_string();
        self.calls
            .lock()
            .unwrap()
            .push((endpoint.clone(), payload));

        let mut responses = self.responses.lock().unwrap();
        let queue = responses.get_mut(&endpoint).ok_or_else(|| AirbyteError::Status {
            status: 404,
            message: format!("no scripted response for {}", endpoint),
        })?;
        if queue.len() > 1 {
            queue.pop_front().unwrap_or(Ok(Value::Null))
        } else {
            queue
                .front()
                .map(clone_result)
                .unwrap_or(Ok(Value::Null))
        }
    }
}
