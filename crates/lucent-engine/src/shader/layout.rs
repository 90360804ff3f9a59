use crate::render::UniformLocation;

use super::value::UniformType;

/// Largest uniform block a program may declare, in bytes.
///
/// Matches the dynamic-offset alignment used by the uniform arena, so each
/// draw occupies exactly one arena slot.
pub const MAX_UNIFORM_BLOCK_SIZE: u32 = 256;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayoutEntry {
    pub name: String,
    pub ty: UniformType,
    pub offset: u32,
}

/// Byte layout of a program's uniform block.
///
/// Members are placed in declaration order using WGSL uniform address space
/// rules; a uniform's location is its byte offset.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UniformLayout {
    entries: Vec<LayoutEntry>,
    size: u32,
}

impl UniformLayout {
    pub fn new<'a, I>(decls: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, UniformType)>,
    {
        let mut entries = Vec::new();
        let mut cursor = 0u32;

        for (name, ty) in decls {
            let offset = align_up(cursor, ty.align());
            entries.push(LayoutEntry {
                name: name.to_string(),
                ty,
                offset,
            });
            cursor = offset + ty.size();
        }

        // Struct size rounds up to the struct alignment (16 in the uniform space).
        Self {
            entries,
            size: align_up(cursor, 16),
        }
    }

    pub fn location(&self, name: &str) -> Option<UniformLocation> {
        self.entries
            .iter()
            .find(|e| e.name == name)
            .map(|e| UniformLocation(e.offset))
    }

    pub fn entries(&self) -> &[LayoutEntry] {
        &self.entries
    }

    /// Block size in bytes, never zero.
    pub fn size(&self) -> u32 {
        self.size.max(16)
    }
}

#[inline]
fn align_up(v: u32, align: u32) -> u32 {
    v.div_ceil(align) * align
}
