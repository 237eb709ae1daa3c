//! Operand decoding and addressing-mode resolution.
//!
//! Tokens are a single mode letter followed by decimal digits:
//!
//! - `V<n>`: immediate value `n` (read-only)
//! - `R<n>`: `registers[n]`
//! - `P<n>`: `registers[registers[n]]`, bounds-checked on both hops

use std::fmt;
use std::str::FromStr;

use crate::config::{MODE_IMMEDIATE, MODE_POINTER, MODE_REGISTER};
use crate::error::{Result, SimError};
use crate::types::RegisterFile;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Operand {
    Immediate(i64),
    RegisterDirect(i64),
    RegisterPointer(i64),
}

impl Operand {
    /// Parse an operand token. Anything but `[VRP][0-9]+` is rejected.
    pub fn parse(token: &str) -> Result<Self> {
        let invalid = || SimError::InvalidOperandFormat {
            token: token.to_string(),
        };
        let (&mode, digits) = token.as_bytes().split_first().ok_or_else(invalid)?;
        if digits.is_empty() || !digits.iter().all(u8::is_ascii_digit) {
            return Err(invalid());
        }
        // All-ASCII-digit tail, so only overflow can fail here.
        let value: i64 = token[1..].parse().map_err(|_| invalid())?;
        match mode {
            MODE_IMMEDIATE => Ok(Operand::Immediate(value)),
            MODE_REGISTER => Ok(Operand::RegisterDirect(value)),
            MODE_POINTER => Ok(Operand::RegisterPointer(value)),
            _ => Err(invalid()),
        }
    }

    #[must_use]
    pub const fn mode(&self) -> char {
        match self {
            Operand::Immediate(_) => MODE_IMMEDIATE as char,
            Operand::RegisterDirect(_) => MODE_REGISTER as char,
            Operand::RegisterPointer(_) => MODE_POINTER as char,
        }
    }

    pub fn resolve_read(&self, registers: &RegisterFile) -> Result<i64> {
        match *self {
            Operand::Immediate(value) => Ok(value),
            Operand::RegisterDirect(index) => registers.read(index),
            Operand::RegisterPointer(index) => registers.read(registers.read(index)?),
        }
    }

    pub fn resolve_write(&self, registers: &mut RegisterFile, value: i64) -> Result<()> {
        match *self {
            Operand::Immediate(_) => Err(SimError::InvalidWriteTarget {
                operand: self.to_string(),
            }),
            Operand::RegisterDirect(index) => registers.write(index, value),
            Operand::RegisterPointer(index) => {
                let target = registers.read(index)?;
                registers.write(target, value)
            }
        }
    }
}

impl FromStr for Operand {
    type Err = SimError;

    fn from_str(s: &str) -> Result<Self> {
        Operand::parse(s)
    }
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let n = match self {
            Operand::Immediate(n) | Operand::RegisterDirect(n) | Operand::RegisterPointer(n) => n,
        };
        write!(f, "{}{}", self.mode(), n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn regs(values: &[i64]) -> RegisterFile {
        RegisterFile::from(values)
    }

    #[test]
    fn parse_modes() {
        assert_eq!(Operand::parse("V100"), Ok(Operand::Immediate(100)));
        assert_eq!(Operand::parse("R0"), Ok(Operand::RegisterDirect(0)));
        assert_eq!(Operand::parse("P12"), Ok(Operand::RegisterPointer(12)));
        assert_eq!(Operand::parse("V007"), Ok(Operand::Immediate(7)));
    }

    #[test]
    fn parse_rejects_bad_tokens() {
        for token in ["X5", "", "V", "R-1", "R1x", "r1", " R1", "P+2", "VV1", "V99999999999999999999"] {
            assert_eq!(
                Operand::parse(token),
                Err(SimError::InvalidOperandFormat {
                    token: token.to_string()
                }),
                "token {token:?}"
            );
        }
    }

    #[test]
    fn parse_rejects_non_ascii_mode() {
        assert!(Operand::parse("é1").is_err());
    }

    #[test]
    fn read_each_mode() {
        let r = regs(&[2, 10, 5]);
        assert_eq!(Operand::Immediate(42).resolve_read(&r), Ok(42));
        assert_eq!(Operand::RegisterDirect(1).resolve_read(&r), Ok(10));
        assert_eq!(Operand::RegisterPointer(0).resolve_read(&r), Ok(5));
    }

    #[test]
    fn pointer_checks_both_hops() {
        let r = regs(&[7, -1]);
        assert_eq!(
            Operand::RegisterPointer(5).resolve_read(&r),
            Err(SimError::RegisterOutOfRange { index: 5, len: 2 })
        );
        assert_eq!(
            Operand::RegisterPointer(0).resolve_read(&r),
            Err(SimError::RegisterOutOfRange { index: 7, len: 2 })
        );
        assert_eq!(
            Operand::RegisterPointer(1).resolve_read(&r),
            Err(SimError::RegisterOutOfRange { index: -1, len: 2 })
        );
    }

    #[test]
    fn write_through_pointer() {
        let mut r = regs(&[1, 2, 0]);
        Operand::RegisterPointer(0).resolve_write(&mut r, 99).unwrap();
        assert_eq!(r.as_slice(), &[1, 99, 0]);
        Operand::RegisterDirect(2).resolve_write(&mut r, -4).unwrap();
        assert_eq!(r.as_slice(), &[1, 99, -4]);
    }

    #[test]
    fn immediate_is_not_a_write_target() {
        let mut r = regs(&[0]);
        assert_eq!(
            Operand::Immediate(3).resolve_write(&mut r, 1),
            Err(SimError::InvalidWriteTarget {
                operand: "V3".to_string()
            })
        );
        assert_eq!(r.as_slice(), &[0]);
    }

    #[test]
    fn display_matches_token() {
        for token in ["V3", "R0", "P11"] {
            assert_eq!(token.parse::<Operand>().unwrap().to_string(), token);
        }
    }
}
