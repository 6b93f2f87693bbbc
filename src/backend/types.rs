//! Source type names and their IR types.

use std::fmt;

/// IR type of a parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IrType {
    /// `Bool`
    I1,
    /// `Int`
    I32,
    /// `Float`
    Float,
}

impl IrType {
    /// Source spellings in the order they are documented to users
    pub const SUPPORTED: &'static [(&'static str, IrType)] =
        &[("Bool", IrType::I1), ("Int", IrType::I32), ("Float", IrType::Float)];

    /// Map a source type name. Names are case-sensitive.
    pub fn from_source(name: &str) -> Option<Self> {
        Self::SUPPORTED
            .iter()
            .find_map(|(spelling, ty)| (*spelling == name).then_some(*ty))
    }
}

impl fmt::Display for IrType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            IrType::I1 => "i1",
            IrType::I32 => "i32",
            IrType::Float => "float",
        };
        f.write_str(s)
    }
}
