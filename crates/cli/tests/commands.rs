//! Subcommands against a page attached over the fake transport.

use std::sync::Arc;

use base64::Engine;
use base64::prelude::BASE64_STANDARD;
use cdpnav::{Connection, Context, Page};
use cdpnav_cli::cli::{Commands, ImageFormat, PageCommand};
use cdpnav_cli::commands::{run_command, run_page_command, write_image};
use cdpnav_cli::discovery::Endpoint;
use cdpnav_cli::error::CliError;
use cdpnav_cli::session::BrowserConnection;
use cdpnav_runtime::transport::{FakeTransportBuilder, FakeTransportController};
use serde_json::{Value, json};

const SESSION: &str = "S1";

struct Browser {
	connection: BrowserConnection,
	controller: FakeTransportController,
}

impl Browser {
	fn start() -> Self {
		let (parts, controller) = FakeTransportBuilder::new().build();
		let connection = BrowserConnection::from_connection(
			Arc::new(Connection::new(parts)),
			Endpoint::WebSocket("ws://127.0.0.1:9222/devtools/browser/fake".into()),
		);
		Self { connection, controller }
	}

	async fn reply(&self, method: &str, result: Value) -> Value {
		let request = self.controller.wait_for_request(method).await;
		self.controller.inject_response(request["id"].as_u64().unwrap(), result);
		request
	}

	fn lifecycle(&self, frame: &str, name: &str) {
		self.controller.inject_session_event(
			SESSION,
			"Page.lifecycleEvent",
			json!({"frameId": frame, "loaderId": "L1", "name": name, "timestamp": 1.0}),
		);
	}

	/// Attaches to `T1` with main frame `MAIN`.
	async fn attach(&self, ctx: &Context) -> Page {
		let browser_side = async {
			self.reply("Target.attachToTarget", json!({"sessionId": SESSION})).await;
			self.reply("Page.enable", json!({})).await;
			self.reply("Page.setLifecycleEventsEnabled", json!({})).await;
			self.reply("Page.getFrameTree", json!({"frameTree": {"frame": {"id": "MAIN", "url": "about:blank"}}})).await;
		};
		let (page, ()) = tokio::join!(self.connection.attach_page(ctx, Some("T1")), browser_side);
		page.unwrap()
	}
}

fn evaluated(value: &str) -> Value {
	json!({"result": {"type": "string", "value": value}})
}

#[tokio::test]
async fn navigate_prints_final_location() {
	let browser = Browser::start();
	let ctx = Context::new();
	let page = browser.attach(&ctx).await;

	let mut out = Vec::new();
	let command = PageCommand::Navigate {
		url: "https://example.com/".into(),
	};
	let browser_side = async {
		let request = browser.reply("Page.navigate", json!({"frameId": "MAIN", "loaderId": "L1"})).await;
		assert_eq!(request["params"]["url"], "https://example.com/");
		browser.lifecycle("MAIN", "load");
		browser.reply("Runtime.evaluate", evaluated("https://example.com/")).await;
	};
	let (result, ()) = tokio::join!(run_page_command(&command, &page, &ctx, &mut out), browser_side);

	result.unwrap();
	assert_eq!(String::from_utf8(out).unwrap(), "https://example.com/\n");
	assert_eq!(page.target().listener_count(), 0);
}

#[tokio::test]
async fn reload_with_ignore_cache_sets_flag() {
	let browser = Browser::start();
	let ctx = Context::new();
	let page = browser.attach(&ctx).await;

	let mut out = Vec::new();
	let browser_side = async {
		let request = browser.reply("Page.reload", json!({})).await;
		browser.lifecycle("MAIN", "load");
		browser.reply("Runtime.evaluate", evaluated("https://example.com/")).await;
		request
	};
	let (result, request) = tokio::join!(run_page_command(&PageCommand::Reload { ignore_cache: true }, &page, &ctx, &mut out), browser_side);

	result.unwrap();
	assert_eq!(request["params"], json!({"ignoreCache": true}));
}

#[tokio::test]
async fn back_at_first_entry_fails_before_navigating() {
	let browser = Browser::start();
	let ctx = Context::new();
	let page = browser.attach(&ctx).await;

	let mut out = Vec::new();
	let (result, _) = tokio::join!(
		run_page_command(&PageCommand::Back, &page, &ctx, &mut out),
		browser.reply("Page.getNavigationHistory", json!({"currentIndex": 0, "entries": [{"id": 1, "url": "about:blank"}]}))
	);

	let err = result.unwrap_err();
	assert!(matches!(err, CliError::Cdp(cdpnav::Error::InvalidNavigationEntry { current_index: 0, len: 1 })));
	assert_eq!(err.exit_code(), 1);
	assert!(browser.controller.take_sent().await.is_empty());
	assert!(out.is_empty());
}

#[tokio::test]
async fn history_lists_entries() {
	let browser = Browser::start();
	let ctx = Context::new();
	let page = browser.attach(&ctx).await;

	let mut out = Vec::new();
	let (result, _) = tokio::join!(
		run_page_command(&PageCommand::History, &page, &ctx, &mut out),
		browser.reply(
			"Page.getNavigationHistory",
			json!({"currentIndex": 0, "entries": [
				{"id": 1, "url": "https://a.test/", "title": "A"},
				{"id": 2, "url": "https://b.test/", "title": ""}
			]})
		)
	);

	result.unwrap();
	assert_eq!(String::from_utf8(out).unwrap(), "*  0  https://a.test/  (A)\n   1  https://b.test/\n");
}

#[tokio::test]
async fn screenshot_is_written_to_disk() -> anyhow::Result<()> {
	let browser = Browser::start();
	let ctx = Context::new();
	let page = browser.attach(&ctx).await;

	let dir = tempfile::tempdir()?;
	let output = dir.path().join("shots").join("page.jpg");
	let command = PageCommand::Screenshot {
		output: output.clone(),
		format: ImageFormat::Jpeg,
		quality: Some(60),
	};

	let mut out = Vec::new();
	let (result, request) = tokio::join!(
		run_page_command(&command, &page, &ctx, &mut out),
		browser.reply("Page.captureScreenshot", json!({"data": BASE64_STANDARD.encode(b"\xff\xd8\xff\xe0jpeg")}))
	);

	result?;
	assert_eq!(request["params"], json!({"format": "jpeg", "quality": 60}));
	assert_eq!(std::fs::read(&output)?, b"\xff\xd8\xff\xe0jpeg");
	assert_eq!(String::from_utf8(out)?, format!("{}\n", output.display()));
	Ok(())
}

#[tokio::test]
async fn png_screenshot_drops_quality() {
	let browser = Browser::start();
	let ctx = Context::new();
	let page = browser.attach(&ctx).await;

	let dir = tempfile::tempdir().unwrap();
	let command = PageCommand::Screenshot {
		output: dir.path().join("page.png"),
		format: ImageFormat::Png,
		quality: Some(60),
	};

	let mut out = Vec::new();
	let (result, request) = tokio::join!(
		run_page_command(&command, &page, &ctx, &mut out),
		browser.reply("Page.captureScreenshot", json!({"data": BASE64_STANDARD.encode(b"png")}))
	);

	result.unwrap();
	assert_eq!(request["params"], json!({"format": "png"}));
}

#[tokio::test]
async fn title_is_printed() {
	let browser = Browser::start();
	let ctx = Context::new();
	let page = browser.attach(&ctx).await;

	let mut out = Vec::new();
	let (result, _) = tokio::join!(
		run_page_command(&PageCommand::Title, &page, &ctx, &mut out),
		browser.reply("Runtime.evaluate", evaluated("Example Domain"))
	);

	result.unwrap();
	assert_eq!(String::from_utf8(out).unwrap(), "Example Domain\n");
}

#[tokio::test]
async fn targets_come_from_the_browser_session() {
	let browser = Browser::start();
	let ctx = Context::new();

	let mut out = Vec::new();
	let (result, request) = tokio::join!(
		run_command(&Commands::Targets, &browser.connection, &ctx, None, &mut out),
		browser.reply(
			"Target.getTargets",
			json!({"targetInfos": [
				{"targetId": "T1", "type": "page", "title": "A", "url": "https://a.test/", "attached": false},
				{"targetId": "B1", "type": "browser", "title": "", "url": "", "attached": true}
			]})
		)
	);

	result.unwrap();
	assert!(request.get("sessionId").is_none());
	assert_eq!(String::from_utf8(out).unwrap(), "T1  https://a.test/  A\n");
}

#[tokio::test]
async fn page_commands_attach_before_running() {
	let browser = Browser::start();
	let ctx = Context::new();

	let mut out = Vec::new();
	let browser_side = async {
		let attach = browser.reply("Target.attachToTarget", json!({"sessionId": SESSION})).await;
		browser.reply("Page.enable", json!({})).await;
		browser.reply("Page.setLifecycleEventsEnabled", json!({})).await;
		browser.reply("Page.getFrameTree", json!({"frameTree": {"frame": {"id": "MAIN", "url": "about:blank"}}})).await;
		browser.reply("Runtime.evaluate", evaluated("Example Domain")).await;
		attach
	};
	let (result, attach) = tokio::join!(
		run_command(&Commands::Page(PageCommand::Title), &browser.connection, &ctx, Some("T1"), &mut out),
		browser_side
	);

	result.unwrap();
	assert_eq!(attach["params"]["targetId"], "T1");
	assert_eq!(String::from_utf8(out).unwrap(), "Example Domain\n");
}

#[test]
fn write_image_reports_path_on_failure() {
	let dir = tempfile::tempdir().unwrap();
	let blocker = dir.path().join("file");
	std::fs::write(&blocker, b"x").unwrap();

	let err = write_image(&blocker.join("nested.png"), b"png").unwrap_err();
	assert!(matches!(err, CliError::Write { ref path, .. } if path.ends_with("nested.png")));
}
