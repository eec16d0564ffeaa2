//! PE header patching.
//!
//! The optional header's `Subsystem` field decides whether Windows opens a
//! console for the process. It sits at the same offset (68) in PE32 and
//! PE32+ optional headers.

use crate::bundler::settings::Subsystem;
use goblin::pe::header::Header;

const PE_SIGNATURE_LEN: usize = 4;
const COFF_HEADER_LEN: usize = 20;
const SUBSYSTEM_OFFSET: usize = 68;

/// Returns the file offset of the `Subsystem` field, if `image` is a PE file.
pub fn subsystem_offset(image: &[u8]) -> Option<usize> {
    let header = Header::parse(image).ok()?;
    if header.optional_header.is_none() {
        return None;
    }

    let offset = header.dos_header.pe_pointer as usize
        + PE_SIGNATURE_LEN
        + COFF_HEADER_LEN
        + SUBSYSTEM_OFFSET;
    (offset + 2 <= image.len()).then_some(offset)
}

/// Reads the current subsystem value.
pub fn subsystem(image: &[u8]) -> Option<u16> {
    let offset = subsystem_offset(image)?;
    Some(u16::from_le_bytes([image[offset], image[offset + 1]]))
}

/// Writes `subsystem` into the optional header.
///
/// Returns false, leaving `image` untouched, when it is not a PE file.
pub fn set_subsystem(image: &mut [u8], subsystem: Subsystem) -> bool {
    match subsystem_offset(image) {
        Some(offset) => {
            image[offset..offset + 2].copy_from_slice(&subsystem.value().to_le_bytes());
            true
        }
        None => false,
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// A header-only PE32+ image (no sections) with the given subsystem.
    pub(crate) fn minimal_pe(subsystem: u16) -> Vec<u8> {
        const PE_POINTER: usize = 0x80;
        const OPTIONAL_HEADER_LEN: usize = 240;

        let mut image = vec![0u8; 512];
        image[0..2].copy_from_slice(b"MZ");
        image[0x3c..0x40].copy_from_slice(&(PE_POINTER as u32).to_le_bytes());
        image[PE_POINTER..PE_POINTER + 4].copy_from_slice(b"PE\0\0");

        let coff = PE_POINTER + 4;
        image[coff..coff + 2].copy_from_slice(&0x8664u16.to_le_bytes());
        image[coff + 16..coff + 18].copy_from_slice(&(OPTIONAL_HEADER_LEN as u16).to_le_bytes());
        image[coff + 18..coff + 20].copy_from_slice(&0x0022u16.to_le_bytes());

        let optional = coff + 20;
        image[optional..optional + 2].copy_from_slice(&0x020bu16.to_le_bytes());
        image[optional + 32..optional + 36].copy_from_slice(&0x1000u32.to_le_bytes());
        image[optional + 36..optional + 40].copy_from_slice(&0x200u32.to_le_bytes());
        image[optional + 68..optional + 70].copy_from_slice(&subsystem.to_le_bytes());
        image[optional + 108..optional + 112].copy_from_slice(&16u32.to_le_bytes());
        image
    }

    #[test]
    fn patches_console_binary_to_gui() {
        let mut image = minimal_pe(3);
        assert_eq!(subsystem(&image), Some(3));

        assert!(set_subsystem(&mut image, Subsystem::Windows));
        assert_eq!(subsystem(&image), Some(2));

        assert!(set_subsystem(&mut image, Subsystem::Console));
        assert_eq!(subsystem(&image), Some(3));
    }

    #[test]
    fn leaves_non_pe_untouched() {
        let mut image = b"\x7fELF not a windows binary at all".to_vec();
        let original = image.clone();
        assert!(!set_subsystem(&mut image, Subsystem::Windows));
        assert_eq!(image, original);
    }
}
