//! Custom assertion macros and utilities

/// Assert that a result is ok and return the value
#[macro_export]
macro_rules! assert_ok {
    ($result:expr) => {
        match $result {
            Ok(value) => value,
            Err(e) => panic!("Expected Ok, got Err: {:?}", e),
        }
    };
    ($result:expr, $message:expr) => {
        match $result {
            Ok(value) => value,
            Err(e) => panic!("{}: {:?}", $message, e),
        }
    };
}

/// Assert that a JSON error body carries the given status
#[macro_export]
macro_rules! assert_error_body {
    ($response:expr, $status:expr) => {{
        $response.assert_status($status);
        let body: serde_json::Value = $response.json();
        assert_eq!(body["status"], $status.as_u16(), "unexpected body: {}", body);
        assert!(body["error"].is_string(), "missing error message: {}", body);
    }};
}
