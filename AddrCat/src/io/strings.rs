//! String encodings shared by the catalog reader and writer
//!
//! Narrow strings store one byte per character (code points up to 255),
//! wide strings store UTF-16LE code units. A string's 4-byte reference packs
//! two flags in its top bits; the remaining 30 bits are the offset of the
//! first character (the 4-byte length prefix sits just before it).

/// Reference value denoting an absent string / object / array.
pub const NULL_OFFSET: u32 = u32::MAX;

/// Flag bit: the referenced string is UTF-16.
pub const WIDE_FLAG: u32 = 0x8000_0000;

/// Flag bit: the reference points at a dynamic-string chain.
pub const DYNAMIC_FLAG: u32 = 0x4000_0000;

/// Mask extracting the offset from a string reference.
pub const OFFSET_MASK: u32 = 0x3fff_ffff;

/// Minimum grouped byte length before a dynamic-string segment group is closed.
pub const MIN_SPLIT_SIZE: isize = 8;

/// True when every character fits in one byte.
#[must_use]
pub fn is_narrow(value: &str) -> bool {
    value.chars().all(|c| u32::from(c) <= 0xFF)
}

/// Encode a string one byte per character. Callers check [`is_narrow`] first.
#[must_use]
pub fn encode_narrow(value: &str) -> Vec<u8> {
    value.chars().map(|c| u32::from(c) as u8).collect()
}

#[must_use]
pub fn decode_narrow(data: &[u8]) -> String {
    data.iter().map(|&b| char::from(b)).collect()
}

#[must_use]
pub fn encode_wide(value: &str) -> Vec<u8> {
    value.encode_utf16().flat_map(u16::to_le_bytes).collect()
}

#[must_use]
pub fn decode_wide(data: &[u8]) -> String {
    let units: Vec<u16> = data
        .chunks_exact(2)
        .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
        .collect();
    String::from_utf16_lossy(&units)
}

/// Encode with the chosen width.
#[must_use]
pub fn encode(value: &str, wide: bool) -> Vec<u8> {
    if wide { encode_wide(value) } else { encode_narrow(value) }
}

/// Byte length of `value` in the chosen width.
#[must_use]
pub fn encoded_len(value: &str, wide: bool) -> usize {
    if wide {
        value.encode_utf16().count() * 2
    } else {
        value.chars().count()
    }
}

/// Length in UTF-16 code units, the unit the separator heuristics count in.
#[must_use]
pub fn utf16_len(value: &str) -> usize {
    value.encode_utf16().count()
}

/// Group the separator-split parts of `value` for a dynamic-string chain.
///
/// Parts are grouped from the end of the string backwards until a group's
/// byte length reaches [`MIN_SPLIT_SIZE`]. The returned groups are ordered
/// from the end of the string to its start. `None` means the string should be
/// stored plain.
#[must_use]
pub fn plan_dynamic_split(value: &str, separator: char, wide: bool) -> Option<Vec<String>> {
    let parts: Vec<&str> = value.split(separator).collect();
    let sep = separator.to_string();

    let mut groups = Vec::with_capacity(parts.len());
    // one separator fewer than parts
    let mut current_len: isize = -1;
    let mut total_len: isize = 0;
    let mut current: Vec<&str> = Vec::new();

    for (i, part) in parts.iter().enumerate().rev() {
        current.push(part);
        current_len += encoded_len(part, wide) as isize + 1;

        if current_len >= MIN_SPLIT_SIZE || i == 0 {
            if current.len() == 1 {
                groups.push(current[0].to_owned());
            } else {
                let ordered: Vec<&str> = current.iter().rev().copied().collect();
                groups.push(ordered.join(&sep));
            }

            // only part contents count, not separators
            total_len += current_len.max(0) - (current.len() as isize - 1);

            current_len = -1;
            current.clear();
        }
    }

    if parts.len() < 2 || (parts.len() == 2 && total_len < MIN_SPLIT_SIZE) {
        return None;
    }

    Some(groups)
}
