/// Embed colors used for run digests.
pub const COLOR_SUCCESS: u32 = 0x2ecc71;
pub const COLOR_PARTIAL: u32 = 0xf39c12;
pub const COLOR_FAILURE: u32 = 0xe74c3c;

/// Human-readable run summary posted to a channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Digest {
    pub title: String,
    pub color: u32,
    pub description: String,
    pub fields: Vec<DigestField>,
    pub footer: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DigestField {
    pub name: String,
    pub value: String,
    pub inline: bool,
}

impl Digest {
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|f| f.name == name)
            .map(|f| f.value.as_str())
    }
}
