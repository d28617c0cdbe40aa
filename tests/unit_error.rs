use std::path::PathBuf;

use taskpad::error::{exit_codes, Error, JsonError};

#[test]
fn exit_codes_map_correctly() {
    let user = Error::InvalidArgument("bad".to_string());
    assert_eq!(user.exit_code(), exit_codes::USER_ERROR);

    let key = Error::InvalidKey("../etc".to_string());
    assert_eq!(key.exit_code(), exit_codes::USER_ERROR);

    let lock = Error::LockFailed(PathBuf::from("/tmp/tasks.json.lock"));
    assert_eq!(lock.exit_code(), exit_codes::OPERATION_FAILED);

    let op = Error::OperationFailed("boom".to_string());
    assert_eq!(op.exit_code(), exit_codes::OPERATION_FAILED);
}

#[test]
fn json_error_includes_code_and_details() {
    let err = Error::InvalidArgument("title cannot be empty".to_string());
    let json = JsonError::from(&err);
    assert_eq!(json.code, exit_codes::USER_ERROR);
    assert!(json.error.contains("title cannot be empty"));
    assert!(json.details.is_none());

    let err = Error::LockFailed(PathBuf::from("/data/tasks.json.lock"));
    let json = JsonError::from(&err);
    assert_eq!(
        json.details.as_ref().and_then(|d| d["path"].as_str()),
        Some("/data/tasks.json.lock")
    );
}
