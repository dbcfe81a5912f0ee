//! Deterministic global identifiers.
//!
//! Every exported object gets a name-based (v5) UUID derived from the
//! scenario name and the object's position in the hierarchy, so converting
//! the same inputs twice produces identical files.

use uuid::Uuid;

/// Alphabet of the IFC compressed GUID encoding.
const IFC_GUID_CHARS: &[u8; 64] =
    b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz_$";

/// Issues stable identifiers within one scenario.
#[derive(Debug, Clone)]
pub struct GuidGenerator {
    namespace: Uuid,
}

impl GuidGenerator {
    pub fn new(scenario: &str) -> Self {
        let namespace = Uuid::new_v5(&Uuid::NAMESPACE_URL, format!("rockbim:{scenario}").as_bytes());
        Self { namespace }
    }

    /// UUID for the object at `path`, e.g. `trajectory/2/instance/14`.
    pub fn uuid(&self, path: &str) -> Uuid {
        Uuid::new_v5(&self.namespace, path.as_bytes())
    }

    /// 22-character IFC `GlobalId` for the object at `path`.
    pub fn ifc_guid(&self, path: &str) -> String {
        compress(&self.uuid(path))
    }
}

/// Encode a UUID in the 22-character IFC base-64 form.
///
/// The first byte yields two characters, each following 3-byte group four.
pub fn compress(uuid: &Uuid) -> String {
    let bytes = uuid.as_bytes();
    let mut out = String::with_capacity(22);
    push_base64(&mut out, bytes[0] as u32, 2);
    for chunk in bytes[1..].chunks_exact(3) {
        let value = (chunk[0] as u32) << 16 | (chunk[1] as u32) << 8 | chunk[2] as u32;
        push_base64(&mut out, value, 4);
    }
    out
}

fn push_base64(out: &mut String, value: u32, digits: u32) {
    for i in (0..digits).rev() {
        let index = (value >> (6 * i)) & 0x3f;
        out.push(IFC_GUID_CHARS[index as usize] as char);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compress_length_and_alphabet() {
        let guid = compress(&Uuid::from_u128(0x0123_4567_89ab_cdef_0123_4567_89ab_cdef));
        assert_eq!(guid.len(), 22);
        assert!(guid.bytes().all(|b| IFC_GUID_CHARS.contains(&b)));
    }

    #[test]
    fn test_compress_known_values() {
        assert_eq!(compress(&Uuid::nil()), "0000000000000000000000");
        assert_eq!(compress(&Uuid::from_u128(u128::MAX)), "3$$$$$$$$$$$$$$$$$$$$$");
    }

    #[test]
    fn test_generator_is_deterministic() {
        let a = GuidGenerator::new("Antoniberg");
        let b = GuidGenerator::new("Antoniberg");
        assert_eq!(a.ifc_guid("project"), b.ifc_guid("project"));
        assert_ne!(a.ifc_guid("project"), a.ifc_guid("site"));
        assert_ne!(
            a.ifc_guid("project"),
            GuidGenerator::new("Other").ifc_guid("project")
        );
    }
}
