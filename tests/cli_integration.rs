use assert_cmd::Command;

const FROM: &str = "0x0000000000000000000000000000000000000002";
const TO: &str = "0x0000000000000000000000000000000000000001";

#[test]
fn accepted_transfer_prints_unsigned_transaction() {
    let mut cmd = Command::cargo_bin("weblink-core").unwrap();
    cmd.args([
        "--from", FROM,
        "--to", TO,
        "--amount", "1.5",
        // 10 ether
        "--balance", "10000000000000000000",
        "--gas-price", "1000000000",
        "--gas-estimate", "21000",
        "--nonce", "7",
    ]);

    let assert = cmd.assert().success();
    let stdout = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
    assert!(stdout.contains("fee:"));
    assert!(stdout.contains("max transferable:"));
    assert!(stdout.contains("\"content_hash\": \"0x"));
    assert!(stdout.contains("\"serialized\": \"0x"));
}

#[test]
fn insufficient_balance_exits_nonzero_with_message() {
    let mut cmd = Command::cargo_bin("weblink-core").unwrap();
    cmd.args([
        "--from", FROM,
        "--to", TO,
        "--amount", "9.5",
        "--balance", "10000000000000000000",
        // gas price chosen so the fee is exactly 1 ether
        "--gas-price", "1000000000000000000",
        "--gas-estimate", "1",
        "--gas-limit", "1",
    ]);

    let assert = cmd.assert().failure().code(1);
    let stderr = String::from_utf8(assert.get_output().stderr.clone()).unwrap();
    assert!(stderr.contains("exceeded available balance of 10 Ether"));
    assert!(stderr.contains("Maximum allowable transfer is 9 Ether"));
}

#[test]
fn gas_limit_below_estimate_is_rejected() {
    let mut cmd = Command::cargo_bin("weblink-core").unwrap();
    cmd.args([
        "--from", FROM,
        "--to", TO,
        "--amount", "1",
        "--balance", "10000000000000000000",
        "--gas-price", "1000000000",
        "--gas-estimate", "21000",
        "--gas-limit", "20000",
    ]);

    let assert = cmd.assert().failure().code(1);
    let stderr = String::from_utf8(assert.get_output().stderr.clone()).unwrap();
    assert!(stderr.contains("gasLimit is less than estimated amount: 21000"));
}
