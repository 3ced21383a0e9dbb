//! Smoke tests for the wxpay binary
//!
//! Offline commands run as-is; network commands run against a wiremock
//! server configured through the `WXPAY_*` environment variables.

use std::process::Command;

use wiremock::{
    matchers::{method, path},
    Mock, MockServer, ResponseTemplate,
};
use wxpay_lib::{signing, xml, FieldSet};

const SECRET: &str = "192006250b4c09247ec02edce69f6a2d";

fn wxpay() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_wxpay"));
    for var in [
        "WXPAY_APP_ID",
        "WXPAY_MCH_ID",
        "WXPAY_API_KEY",
        "WXPAY_NOTIFY_URL",
        "WXPAY_PAY_URL",
        "WXPAY_QUERY_URL",
        "WXPAY_TIMEOUT",
    ] {
        cmd.env_remove(var);
    }
    cmd.env("NO_COLOR", "1");
    cmd
}

fn gateway_env(cmd: &mut tokio::process::Command, server: &MockServer) {
    cmd.env("WXPAY_APP_ID", "wx2421b1c4370ec43b")
        .env("WXPAY_MCH_ID", "10000100")
        .env("WXPAY_API_KEY", SECRET)
        .env("WXPAY_NOTIFY_URL", "https://shop.example.com/notify")
        .env("WXPAY_PAY_URL", format!("{}/pay/unifiedorder", server.uri()))
        .env("WXPAY_QUERY_URL", format!("{}/pay/orderquery", server.uri()));
}

/// Test that the CLI can show help
#[test]
fn test_cli_help() {
    let output = wxpay().arg("--help").output().expect("Failed to execute wxpay");
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success());
    for command in ["pay", "query", "sign", "verify", "notify"] {
        assert!(stdout.contains(command), "Help should mention '{}'", command);
    }
}

#[test]
fn test_cli_sign() {
    let output = wxpay()
        .args(["sign", "b=2", "a=1", "empty=", "--key", "SECRET"])
        .output()
        .expect("Failed to execute wxpay");
    let stdout = String::from_utf8_lossy(&output.stdout);

    let fields = FieldSet::new().with("a", "1").with("b", "2");
    assert!(output.status.success());
    assert!(stdout.contains("a=1&b=2"));
    assert!(stdout.contains(&signing::sign(&fields, "SECRET")));
    assert!(!stdout.contains("key=SECRET"));
}

#[test]
fn test_cli_sign_requires_key() {
    let output = wxpay().args(["sign", "a=1"]).output().expect("Failed to execute wxpay");
    assert!(!output.status.success());
}

#[test]
fn test_cli_verify() {
    let data = "out_trade_no=T1&total_fee=100";
    let valid = format!("{:x}", md5::compute(format!("{}&Key={}", data, SECRET)));

    let ok = wxpay()
        .args(["verify", "--data", data, "--sign", &valid, "--key", SECRET])
        .output()
        .expect("Failed to execute wxpay");
    assert!(ok.status.success());

    let bad = wxpay()
        .args(["verify", "--data", data, "--sign", "0000", "--key", SECRET])
        .output()
        .expect("Failed to execute wxpay");
    assert!(!bad.status.success());
}

#[test]
fn test_cli_config_missing() {
    let output = wxpay()
        .args(["query", "T1"])
        .output()
        .expect("Failed to execute wxpay");
    let stderr = String::from_utf8_lossy(&output.stderr);

    assert!(!output.status.success());
    assert!(stderr.contains("WXPAY_APP_ID"));
}

#[tokio::test]
async fn test_cli_pay_against_mock_gateway() {
    let mock_server = MockServer::start().await;

    let reply = FieldSet::new()
        .with("return_code", "SUCCESS")
        .with("result_code", "SUCCESS")
        .with("prepay_id", "wx_prepay_xyz");
    Mock::given(method("POST"))
        .and(path("/pay/unifiedorder"))
        .respond_with(ResponseTemplate::new(200).set_body_string(xml::encode_fields(&reply)))
        .expect(1)
        .mount(&mock_server)
        .await;

    let mut cmd = tokio::process::Command::from(wxpay());
    gateway_env(&mut cmd, &mock_server);
    let output = cmd
        .args([
            "pay",
            "--trade-num",
            "1415659990",
            "--describe",
            "JSAPI test",
            "--amount",
            "1",
            "--open-id",
            "oUpF8uMuAJO_M2pxb1Q9zNjWeS6o",
            "--client-ip",
            "127.0.0.1",
        ])
        .output()
        .await
        .expect("Failed to execute wxpay");
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    assert!(stdout.contains("prepay_id=wx_prepay_xyz"));
    assert!(stdout.contains("paySign"));
}

#[tokio::test]
async fn test_cli_query_failure_is_not_an_error() {
    let mock_server = MockServer::start().await;

    let reply = FieldSet::new()
        .with("return_code", "SUCCESS")
        .with("result_code", "FAIL")
        .with("err_code", "ORDERNOTEXIST")
        .with("err_code_des", "order does not exist");
    Mock::given(method("POST"))
        .and(path("/pay/orderquery"))
        .respond_with(ResponseTemplate::new(200).set_body_string(xml::encode_fields(&reply)))
        .mount(&mock_server)
        .await;

    let mut cmd = tokio::process::Command::from(wxpay());
    gateway_env(&mut cmd, &mock_server);
    let output = cmd
        .args(["query", "missing"])
        .output()
        .await
        .expect("Failed to execute wxpay");
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success());
    assert!(stdout.contains("ORDERNOTEXIST"));
}
