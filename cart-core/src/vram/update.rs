use crate::error::CartError;
use crate::video::PPU_ADDR_MASK;

/// High-byte flag of a sequential run that advances along a row.
pub const NT_UPD_HORZ: u8 = 0x40;
/// High-byte flag of a sequential run that advances down a column.
pub const NT_UPD_VERT: u8 = 0x80;
/// End-of-list marker.
pub const NT_UPD_EOF: u8 = 0xFF;

/// Bytes of address/length header in front of the data of a sequential run.
const SEQUENTIAL_HEADER: usize = 3;

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Orientation {
    Horizontal,
    Vertical,
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum WriteMode {
    Single,
    Sequential(Orientation),
}

/// One pending write to video memory.
///
/// The data is owned by the entry, so the caller's buffer can be reused as
/// soon as the push returns.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct VramUpdate {
    pub address: u16,
    pub mode: WriteMode,
    pub data: Vec<u8>,
}

impl VramUpdate {
    pub fn single(address: u16, value: u8) -> Self {
        VramUpdate {
            address: address & PPU_ADDR_MASK,
            mode: WriteMode::Single,
            data: vec![value],
        }
    }

    pub fn sequential(address: u16, data: &[u8], orientation: Orientation) -> Self {
        VramUpdate {
            address: address & PPU_ADDR_MASK,
            mode: WriteMode::Sequential(orientation),
            data: data.to_vec(),
        }
    }

    /// Address step between consecutive bytes of this entry.
    pub fn stride(&self) -> u16 {
        match self.mode {
            WriteMode::Sequential(Orientation::Vertical) => 32,
            _ => 1,
        }
    }

    /// Size of the entry in the hardware list format, which is also what it
    /// costs out of the per-frame blank budget.
    pub fn encoded_len(&self) -> usize {
        match self.mode {
            WriteMode::Single => 3,
            WriteMode::Sequential(_) => SEQUENTIAL_HEADER + self.data.len(),
        }
    }

    pub fn encode(&self, out: &mut Vec<u8>) {
        let [lo, hi] = self.address.to_le_bytes();
        match self.mode {
            WriteMode::Single => out.extend_from_slice(&[hi, lo, self.data[0]]),
            WriteMode::Sequential(orientation) => {
                let flag = match orientation {
                    Orientation::Horizontal => NT_UPD_HORZ,
                    Orientation::Vertical => NT_UPD_VERT,
                };
                out.extend_from_slice(&[hi | flag, lo, self.data.len() as u8]);
                out.extend_from_slice(&self.data);
            }
        }
    }

    /// Encodes a whole list, terminator included.
    pub fn encode_list(updates: &[VramUpdate]) -> Vec<u8> {
        let mut out = Vec::with_capacity(updates.iter().map(VramUpdate::encoded_len).sum::<usize>() + 1);
        for update in updates {
            update.encode(&mut out);
        }
        out.push(NT_UPD_EOF);
        out
    }

    /// Parses a pre-built update list up to its terminator.
    pub fn decode_list(bytes: &[u8]) -> Result<Vec<VramUpdate>, CartError> {
        let mut updates = Vec::new();
        let mut offset = 0;

        loop {
            let Some(&hi) = bytes.get(offset) else {
                return Err(CartError::MissingTerminator);
            };
            if hi == NT_UPD_EOF {
                return Ok(updates);
            }

            let lo = *bytes.get(offset + 1).ok_or(CartError::TruncatedEntry(offset))?;

            let update = if hi & (NT_UPD_HORZ | NT_UPD_VERT) == 0 {
                let value = *bytes.get(offset + 2).ok_or(CartError::TruncatedEntry(offset))?;
                VramUpdate::single(u16::from_be_bytes([hi, lo]), value)
            } else {
                let orientation = if hi & NT_UPD_VERT != 0 {
                    Orientation::Vertical
                } else {
                    Orientation::Horizontal
                };
                let len = *bytes.get(offset + 2).ok_or(CartError::TruncatedEntry(offset))? as usize;
                if len == 0 {
                    return Err(CartError::EmptyRun(offset));
                }

                let start = offset + SEQUENTIAL_HEADER;
                let data = bytes
                    .get(start..start + len)
                    .ok_or(CartError::TruncatedEntry(offset))?;
                let address = u16::from_be_bytes([hi & !(NT_UPD_HORZ | NT_UPD_VERT), lo]);
                VramUpdate::sequential(address, data, orientation)
            };

            offset += update.encoded_len();
            updates.push(update);
        }
    }
}
