use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum InputKind {
    Descriptor,
    Signature,
}

/// Byte cursor over descriptor/signature text.
///
/// Every delimiter in both grammars is ASCII, so slicing at delimiter positions always lands
/// on a UTF-8 character boundary.
pub(crate) struct Cursor<'a> {
    input: &'a str,
    pos: usize,
    kind: InputKind,
}

impl<'a> Cursor<'a> {
    pub(crate) fn new(input: &'a str, kind: InputKind) -> Self {
        Self {
            input,
            pos: 0,
            kind,
        }
    }

    pub(crate) fn peek(&self) -> Option<u8> {
        self.input.as_bytes().get(self.pos).copied()
    }

    pub(crate) fn bump(&mut self) -> Option<u8> {
        let b = self.peek()?;
        self.pos += 1;
        Some(b)
    }

    pub(crate) fn eat(&mut self, expected: u8) -> bool {
        if self.peek() == Some(expected) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    pub(crate) fn expect(&mut self, expected: u8, reason: &'static str) -> Result<()> {
        if self.eat(expected) {
            Ok(())
        } else {
            Err(self.error(reason))
        }
    }

    pub(crate) fn is_eof(&self) -> bool {
        self.pos >= self.input.len()
    }

    /// Reads a non-empty run of bytes up to (not including) the first byte in `stops`.
    ///
    /// Hitting the end of input or any byte in `forbidden` first is an error.
    pub(crate) fn name_until(
        &mut self,
        stops: &[u8],
        forbidden: &[u8],
        reason: &'static str,
    ) -> Result<&'a str> {
        let start = self.pos;
        loop {
            match self.peek() {
                None => return Err(self.error(reason)),
                Some(b) if stops.contains(&b) => break,
                Some(b) if forbidden.contains(&b) => return Err(self.error(reason)),
                Some(_) => self.pos += 1,
            }
        }
        if self.pos == start {
            return Err(self.error(reason));
        }
        Ok(&self.input[start..self.pos])
    }

    pub(crate) fn finish(&self) -> Result<()> {
        if self.is_eof() {
            Ok(())
        } else {
            Err(self.error("unexpected trailing characters"))
        }
    }

    pub(crate) fn error(&self, reason: &'static str) -> Error {
        match self.kind {
            InputKind::Descriptor => Error::InvalidDescriptor {
                descriptor: self.input.to_string(),
                offset: self.pos,
                reason,
            },
            InputKind::Signature => Error::InvalidSignature {
                signature: self.input.to_string(),
                offset: self.pos,
                reason,
            },
        }
    }
}
