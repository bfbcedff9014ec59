use bytes::{Buf, BufMut};
use commonware_codec::{EncodeSize, Error, Read, ReadExt, Write};
use commonware_cryptography::ed25519::PublicKey;

use super::{MAX_TICKET_NUMBER, MIN_TICKET_NUMBER};

/// A purchased ticket. The ticket id is its key in the engine's ticket table; the round it
/// belongs to follows from the round's ticket id range.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Ticket {
    pub number: u32,
    pub owner: PublicKey,
    pub claimed: bool,
}

impl Ticket {
    pub fn new(number: u32, owner: PublicKey) -> Self {
        Self {
            number,
            owner,
            claimed: false,
        }
    }
}

impl Write for Ticket {
    fn write(&self, writer: &mut impl BufMut) {
        self.number.write(writer);
        self.owner.write(writer);
        self.claimed.write(writer);
    }
}

impl Read for Ticket {
    type Cfg = ();

    fn read_cfg(reader: &mut impl Buf, _: &Self::Cfg) -> Result<Self, Error> {
        let number = u32::read(reader)?;
        if !(MIN_TICKET_NUMBER..=MAX_TICKET_NUMBER).contains(&number) {
            return Err(Error::Invalid("Ticket", "number out of range"));
        }
        Ok(Self {
            number,
            owner: PublicKey::read(reader)?,
            claimed: bool::read(reader)?,
        })
    }
}

impl EncodeSize for Ticket {
    fn encode_size(&self) -> usize {
        self.number.encode_size() + self.owner.encode_size() + self.claimed.encode_size()
    }
}
