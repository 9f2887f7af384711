use domain_scout::config::{parse_config, Config};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const SOURCE_PATH: &str = "/sites/320.html";

/// A page shaped like the aggregator's, with two announced addresses
pub const SOURCE_PAGE: &str = r#"<!DOCTYPE html>
<html>
<head><meta charset="utf-8"><title>Z-Library</title></head>
<body>
  <article>
    <h1>Z-Library</h1>
    <p>介绍文字 https://not-in-section.example</p>
    <h2>最新官网地址</h2>
    <p><strong><span style="color: #0000ff;">官方地址：</span>https://zlib-official.example 👉点击访问</strong></p>
    <p><b><span style="color:#0000FF">第三方镜像:</span> https://zlib-mirror.example/</b></p>
    <h2>使用说明</h2>
    <p><strong><span style="color: #0000ff">官方地址:</span> https://after-section.example</strong></p>
  </article>
</body>
</html>"#;

/// Builds a config pointing at the mock server
///
/// `store` is the body of the `[store]` section.
pub fn config_for(server: &MockServer, store: &str) -> Config {
    let content = format!(
        r#"
[source]
url = "{}{}"
timeout-secs = 2

[user-agent]
crawler-name = "TestScout"
crawler-version = "1.0"
contact-url = "https://example.com/about"
contact-email = "admin@example.com"

[store]
{}

[schedule]
cron = "0 0 2 * * *"
run-on-start = true

[server]
bind = "127.0.0.1:0"
"#,
        server.uri(),
        SOURCE_PATH,
        store
    );
    parse_config(&content).expect("test config should be valid")
}

pub async fn mount_page(server: &MockServer, expected_calls: u64) {
    Mock::given(method("GET"))
        .and(path(SOURCE_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string(SOURCE_PAGE))
        .expect(expected_calls)
        .mount(server)
        .await;
}

pub async fn mount_status(server: &MockServer, status: u16) {
    Mock::given(method("GET"))
        .and(path(SOURCE_PATH))
        .respond_with(ResponseTemplate::new(status))
        .mount(server)
        .await;
}

pub fn toml_path(path: &std::path::Path) -> String {
    path.display().to_string().replace('\\', "/")
}
