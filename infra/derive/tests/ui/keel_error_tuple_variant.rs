use keel_derive::keel_error;

#[keel_error]
pub enum RegistryError {
    Io(std::io::Error),
}

fn main() {}
