#![doc(hidden)]

macro_rules! unwrap {
    ($expr:expr) => (match $expr {
        Ok(t) => t,
        Err(e) =>
            panic!("called `unwrap!()` on an `Err` value: {:?}", e)
    })
}

macro_rules! assert_err {
    ($expr:expr, $err_pat:pat => $blk:block) => (match $expr {
        Ok(_) => { panic!("unexpected success"); }
        Err($err_pat) => $blk,
        #[allow(unreachable_patterns)]
        Err(e) => { panic!("unexpected error: {:?}", e); }
    })
}

/// Assert that `$expr` fails with a `SpecViolation` mentioning `$needle`.
macro_rules! assert_violation {
    ($expr:expr, $needle:expr) => (
        assert_err!($expr, $crate::schema::SchemaError::SpecViolation(msg) => {
            assert!(msg.contains($needle), "{:?} does not mention {:?}", msg, $needle);
        })
    )
}
