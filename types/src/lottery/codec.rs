use bytes::{Buf, BufMut};
use commonware_codec::{Error, ReadExt, Write};

use super::BRACKET_COUNT;

/// Write one `u16` per bracket, in bracket order.
pub fn write_u16_array(values: &[u16; BRACKET_COUNT], writer: &mut impl BufMut) {
    for value in values {
        value.write(writer);
    }
}

/// Read one `u16` per bracket, in bracket order.
pub fn read_u16_array(reader: &mut impl Buf) -> Result<[u16; BRACKET_COUNT], Error> {
    let mut values = [0u16; BRACKET_COUNT];
    for value in values.iter_mut() {
        *value = u16::read(reader)?;
    }
    Ok(values)
}

/// Write one `u64` per bracket, in bracket order.
pub fn write_u64_array(values: &[u64; BRACKET_COUNT], writer: &mut impl BufMut) {
    for value in values {
        value.write(writer);
    }
}

/// Read one `u64` per bracket, in bracket order.
pub fn read_u64_array(reader: &mut impl Buf) -> Result<[u64; BRACKET_COUNT], Error> {
    let mut values = [0u64; BRACKET_COUNT];
    for value in values.iter_mut() {
        *value = u64::read(reader)?;
    }
    Ok(values)
}
