use bytes::Bytes;

/// A quantum signal in flight.
///
/// The physical state is out of scope for the kernel; a photon is an identity plus an opaque
/// encoding that higher layers may interpret.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Photon {
    name: String,
    encoding: Bytes,
}

impl Photon {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            encoding: Bytes::new(),
        }
    }

    pub fn with_encoding(name: impl Into<String>, encoding: impl Into<Bytes>) -> Self {
        Self {
            name: name.into(),
            encoding: encoding.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn encoding(&self) -> &Bytes {
        &self.encoding
    }
}
