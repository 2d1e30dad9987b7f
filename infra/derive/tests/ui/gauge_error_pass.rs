use gauge_derive::gauge_error;
use std::borrow::Cow;

#[gauge_error]
pub enum DemoError {
    #[error("IO error{}: {source}", format_context(.context))]
    Io {
        #[source]
        source: std::io::Error,
        context: Option<Cow<'static, str>>,
    },

    #[error("Missing `{field}`{}", format_context(.context))]
    Missing { field: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

fn read() -> Result<String, DemoError> {
    std::fs::read_to_string("/nonexistent").context("reading")
}

fn main() {
    let _ = read();
    let _ = DemoError::from(std::io::Error::other("boom"));
}
