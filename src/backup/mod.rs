pub mod compress;
pub mod config;
pub mod file_ext;
pub mod job;
pub mod result_error;
pub mod settings;
pub mod snapshot;
pub mod tar;
pub mod validate;

macro_rules! function_path {
    () => {
        concat!(module_path!(), "::", function_name!(), " ", file!(), ":", line!())
    };
}

pub(crate) use function_path;
