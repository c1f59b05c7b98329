use keel_derive::keel_error;

#[keel_error]
pub enum RegistryError {
    #[error("IO error: {source}")]
    Io {
        #[source]
        source: std::io::Error,
        context: Option<String>,
    },
}

fn main() {}
