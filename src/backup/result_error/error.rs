use crate::backup::result_error::{WithDebugObjectAndFnName, WithMsg};
use std::fmt::Debug;
use std::num::{ParseFloatError, ParseIntError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Ini(#[from] ini::Error),
    #[error(transparent)]
    ValidationError(#[from] validator::ValidationErrors),
    #[error(transparent)]
    ParseInt(#[from] ParseIntError),
    #[error(transparent)]
    ParseFloat(#[from] ParseFloatError),
    #[error("Not a boolean: {0:?}")]
    InvalidBool(String),
    #[error("Malformed snapshot file name {file_name:?}: {reason}")]
    MalformedSnapshotName { file_name: String, reason: String },
    #[error("{}:\n{}", msg, indent::indent_all_with("  ", error.to_string()))]
    WithMsg { msg: String, error: Box<Error> },
    #[error("{:?} {} failed:\n{}", obj_debug, fn_name, indent::indent_all_with("  ", error.to_string()))]
    WithDebugObjAndFnName {
        error: Box<Error>,
        obj_debug: Box<dyn Debug + Send>,
        fn_name: String,
    },
}

impl<S: Into<String>, O: Debug + Send + 'static> WithDebugObjectAndFnName<S, O> for Error {
    fn with_debug_object_and_fn_name(self, obj: O, fn_name: S) -> Self {
        Error::WithDebugObjAndFnName {
            error: Box::new(self),
            obj_debug: Box::new(obj),
            fn_name: fn_name.into(),
        }
    }
}

impl<S: Into<String>> WithMsg<S> for Error {
    fn with_msg(self, msg: S) -> Self {
        Self::WithMsg {
            msg: msg.into(),
            error: Box::new(self),
        }
    }
}

impl Error {
    pub fn malformed_snapshot_name<A: Into<String>, B: Into<String>>(
        file_name: A,
        reason: B,
    ) -> Self {
        Self::MalformedSnapshotName {
            file_name: file_name.into(),
            reason: reason.into(),
        }
    }

    /// Innermost error once all context wrappers are peeled off.
    pub fn root_cause(&self) -> &Error {
        match self {
            Error::WithMsg { error, .. } => error.root_cause(),
            Error::WithDebugObjAndFnName { error, .. } => error.root_cause(),
            e => e,
        }
    }
}
