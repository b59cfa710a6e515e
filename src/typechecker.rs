use crate::lexer::TokenKind;

/// The source language's primitive types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BuiltinType {
    U8,
    I8,
    U16,
    I16,
    U32,
    I32,
    U64,
    I64,
    F32,
    F64,
    Char,
}

/// All members of the enumeration, in declaration order.
pub const BUILTIN_TYPES: [BuiltinType; 11] = [
    BuiltinType::U8,
    BuiltinType::I8,
    BuiltinType::U16,
    BuiltinType::I16,
    BuiltinType::U32,
    BuiltinType::I32,
    BuiltinType::U64,
    BuiltinType::I64,
    BuiltinType::F32,
    BuiltinType::F64,
    BuiltinType::Char,
];

impl BuiltinType {
    /// Resolves a source spelling. Unknown spellings are `None`; they may
    /// still name a user-defined struct type.
    pub fn parse(spelling: &str) -> Option<Self> {
        let ty = match spelling {
            "u8" => Self::U8,
            "i8" => Self::I8,
            "u16" => Self::U16,
            "i16" => Self::I16,
            "u32" => Self::U32,
            "i32" => Self::I32,
            "u64" => Self::U64,
            "i64" => Self::I64,
            "f32" => Self::F32,
            "f64" => Self::F64,
            "char" => Self::Char,
            _ => return None,
        };
        Some(ty)
    }

    /// Resolves a keyword token to the type it names.
    pub fn from_token(kind: TokenKind) -> Option<Self> {
        let ty = match kind {
            TokenKind::U8 => Self::U8,
            TokenKind::I8 => Self::I8,
            TokenKind::U16 => Self::U16,
            TokenKind::I16 => Self::I16,
            TokenKind::U32 => Self::U32,
            TokenKind::I32 => Self::I32,
            TokenKind::U64 => Self::U64,
            TokenKind::I64 => Self::I64,
            TokenKind::F32 => Self::F32,
            TokenKind::F64 => Self::F64,
            TokenKind::Char => Self::Char,
            _ => return None,
        };
        Some(ty)
    }

    /// The source spelling of this type.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::U8 => "u8",
            Self::I8 => "i8",
            Self::U16 => "u16",
            Self::I16 => "i16",
            Self::U32 => "u32",
            Self::I32 => "i32",
            Self::U64 => "u64",
            Self::I64 => "i64",
            Self::F32 => "f32",
            Self::F64 => "f64",
            Self::Char => "char",
        }
    }
}

/// The C spelling of a builtin type. The fixed-width spellings come from
/// `<stdint.h>`, which the parser attaches to every module.
pub fn builtin_to_c(ty: BuiltinType) -> &'static str {
    match ty {
        BuiltinType::U8 => "uint8_t",
        BuiltinType::I8 => "int8_t",
        BuiltinType::U16 => "uint16_t",
        BuiltinType::I16 => "int16_t",
        BuiltinType::U32 => "uint32_t",
        BuiltinType::I32 => "int32_t",
        BuiltinType::U64 => "uint64_t",
        BuiltinType::I64 => "int64_t",
        BuiltinType::F32 => "float",
        BuiltinType::F64 => "double",
        BuiltinType::Char => "char",
    }
}

/// Maps a raw type identifier to its C spelling. Identifiers that do not
/// name a builtin pass through verbatim: they name user structs, whose C
/// typedef carries the same name.
pub fn c_type_for(spelling: &str) -> &str {
    match BuiltinType::parse(spelling) {
        Some(ty) => builtin_to_c(ty),
        None => spelling,
    }
}
