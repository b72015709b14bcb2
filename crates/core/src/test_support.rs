//! Scripted executor for unit tests.

use std::collections::{HashMap, VecDeque};
use std::future::Future;
use std::pin::Pin;

use cdpnav_runtime::{Error, Executor, Result};
use parking_lot::Mutex;
use serde_json::Value;

type Hook = Box<dyn Fn(&str, &Value) + Send + Sync>;

/// Answers commands from per-method queues and records every call.
///
/// An unscripted method fails with a `-32601` protocol error.
#[derive(Default)]
pub struct ScriptedExecutor {
	responses: Mutex<HashMap<String, VecDeque<Result<Value>>>>,
	calls: Mutex<Vec<(String, Value)>>,
	hook: Mutex<Option<Hook>>,
}

impl ScriptedExecutor {
	pub fn respond(&self, method: &str, result: Value) {
		self.push(method, Ok(result));
	}

	pub fn fail(&self, method: &str, error: Error) {
		self.push(method, Err(error));
	}

	/// Runs `hook` for every call, after it is recorded and before it is answered.
	pub fn on_call(&self, hook: impl Fn(&str, &Value) + Send + Sync + 'static) {
		*self.hook.lock() = Some(Box::new(hook));
	}

	pub fn methods(&self) -> Vec<String> {
		self.calls.lock().iter().map(|(m, _)| m.clone()).collect()
	}

	pub fn calls(&self) -> Vec<(String, Value)> {
		self.calls.lock().clone()
	}

	fn push(&self, method: &str, result: Result<Value>) {
		self.responses.lock().entry(method.to_string()).or_default().push_back(result);
	}
}

impl Executor for ScriptedExecutor {
	fn execute<'a>(&'a self, method: &'a str, params: Value) -> Pin<Box<dyn Future<Output = Result<Value>> + Send + 'a>> {
		Box::pin(async move {
			self.calls.lock().push((method.to_string(), params.clone()));
			if let Some(hook) = self.hook.lock().as_ref() {
				hook(method, &params);
			}

			self.responses.lock().get_mut(method).and_then(VecDeque::pop_front).unwrap_or_else(|| {
				Err(Error::Protocol {
					code: -32601,
					message: format!("'{method}' wasn't found"),
				})
			})
		})
	}
}
