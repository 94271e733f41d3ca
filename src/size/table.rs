//! Unit symbol tables

use num_bigint::BigUint;
use num_traits::One;
use std::fmt;
use std::str::FromStr;

use super::SizeError;

/// Symbols per table: the unprefixed unit followed by eight power-of-1024 prefixes.
pub const TABLE_LEN: usize = 9;

const CUSTOMARY: [&str; TABLE_LEN] = ["B", "K", "M", "G", "T", "P", "E", "Z", "Y"];
const CUSTOMARY_EXT: [&str; TABLE_LEN] = [
    "byte", "kilo", "mega", "giga", "tera", "peta", "exa", "zetta", "iotta",
];
const IEC: [&str; TABLE_LEN] = ["Bi", "Ki", "Mi", "Gi", "Ti", "Pi", "Ei", "Zi", "Yi"];
const IEC_EXT: [&str; TABLE_LEN] = [
    "byte", "kibi", "mebi", "gibi", "tebi", "pebi", "exbi", "zebi", "yobi",
];

/// Naming scheme for power-of-1024 magnitudes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum UnitTable {
    #[default]
    Customary,
    CustomaryExt,
    Iec,
    IecExt,
}

impl UnitTable {
    /// All tables, in the order they are searched when parsing.
    pub const ALL: [UnitTable; 4] = [
        UnitTable::Customary,
        UnitTable::CustomaryExt,
        UnitTable::Iec,
        UnitTable::IecExt,
    ];

    /// Name used on the command line and in error messages
    pub fn name(self) -> &'static str {
        match self {
            UnitTable::Customary => "customary",
            UnitTable::CustomaryExt => "customary_ext",
            UnitTable::Iec => "iec",
            UnitTable::IecExt => "iec_ext",
        }
    }

    pub fn symbols(self) -> &'static [&'static str; TABLE_LEN] {
        match self {
            UnitTable::Customary => &CUSTOMARY,
            UnitTable::CustomaryExt => &CUSTOMARY_EXT,
            UnitTable::Iec => &IEC,
            UnitTable::IecExt => &IEC_EXT,
        }
    }

    pub fn symbol(self, index: usize) -> Option<&'static str> {
        self.symbols().get(index).copied()
    }

    /// Index of an exact symbol match in this table
    pub fn position(self, symbol: &str) -> Option<usize> {
        self.symbols().iter().position(|s| *s == symbol)
    }
}

impl fmt::Display for UnitTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for UnitTable {
    type Err = SizeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        UnitTable::ALL
            .into_iter()
            .find(|table| table.name() == s)
            .ok_or_else(|| SizeError::UnknownTable(s.to_string()))
    }
}

/// Byte threshold of the symbol at `index`: `1 << (10 * index)`.
pub fn scale(index: usize) -> BigUint {
    BigUint::one() << (10 * index)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::size::ErrorKind;

    #[test]
    fn test_table_names_round_trip() {
        for table in UnitTable::ALL {
            assert_eq!(table.name().parse::<UnitTable>().unwrap(), table);
            assert_eq!(table.to_string(), table.name());
        }
    }

    #[test]
    fn test_unknown_table_name() {
        let err = "metric".parse::<UnitTable>().unwrap_err();
        assert_eq!(err, SizeError::UnknownTable("metric".to_string()));
        assert_eq!(err.kind(), ErrorKind::Domain);
        // Names are case sensitive
        assert!("IEC".parse::<UnitTable>().is_err());
    }

    #[test]
    fn test_scales() {
        assert_eq!(scale(0), BigUint::from(1u32));
        assert_eq!(scale(1), BigUint::from(1024u32));
        assert_eq!(scale(3), BigUint::from(1_073_741_824u64));
        assert_eq!(scale(8), BigUint::from(1u128 << 80));
    }

    #[test]
    fn test_symbol_lookup() {
        assert_eq!(UnitTable::Iec.symbol(2), Some("Mi"));
        assert_eq!(UnitTable::Iec.symbol(TABLE_LEN), None);
        assert_eq!(UnitTable::CustomaryExt.position("iotta"), Some(8));
        assert_eq!(UnitTable::IecExt.position("byte"), Some(0));
        assert_eq!(UnitTable::Customary.position("k"), None);
    }
}
