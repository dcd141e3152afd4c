//! Custom assertion macros

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

/// Assert that the session is anonymous and nothing is left in storage
#[macro_export]
macro_rules! assert_signed_out {
    ($client:expr, $storage:expr) => {
        assert_eq!(
            $client.session().status(),
            campus_connect::app::SessionStatus::Anonymous,
            "session should be anonymous"
        );
        assert!($client.session().identity().is_none(), "identity should be gone");
        assert!($storage.contents().is_empty(), "durable tokens should be gone");
    };
}
