use std::fmt;

use glam::{Mat4, Vec2, Vec3, Vec4};

/// Declared type of a shader uniform.
///
/// The tag is the single source of truth for both value validation and the
/// upload call selected at push time.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum UniformType {
    Bool,
    Int,
    Float,
    Vec2,
    Vec3,
    Vec4,
    Mat4,
    Sampler2D,
}

impl UniformType {
    /// Size of the value inside a uniform block, in bytes.
    pub const fn size(self) -> u32 {
        match self {
            UniformType::Bool | UniformType::Int | UniformType::Float | UniformType::Sampler2D => 4,
            UniformType::Vec2 => 8,
            UniformType::Vec3 => 12,
            UniformType::Vec4 => 16,
            UniformType::Mat4 => 64,
        }
    }

    /// Alignment inside a uniform block (WGSL uniform address space).
    pub const fn align(self) -> u32 {
        match self {
            UniformType::Bool | UniformType::Int | UniformType::Float | UniformType::Sampler2D => 4,
            UniformType::Vec2 => 8,
            UniformType::Vec3 | UniformType::Vec4 | UniformType::Mat4 => 16,
        }
    }
}

impl fmt::Display for UniformType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            UniformType::Bool => "bool",
            UniformType::Int => "int",
            UniformType::Float => "float",
            UniformType::Vec2 => "vec2",
            UniformType::Vec3 => "vec3",
            UniformType::Vec4 => "vec4",
            UniformType::Mat4 => "mat4",
            UniformType::Sampler2D => "sampler2D",
        };
        f.write_str(s)
    }
}

/// A uniform value.
///
/// Closed over the uniform types the engine can upload. `i32` converts to
/// [`UniformValue::Int`]; samplers are built explicitly with
/// [`UniformValue::sampler`] so a plain integer never satisfies a sampler slot.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum UniformValue {
    Bool(bool),
    Int(i32),
    Float(f32),
    Vec2(Vec2),
    Vec3(Vec3),
    Vec4(Vec4),
    Mat4(Mat4),
    /// Texture unit index.
    Sampler2D(i32),
}

impl UniformValue {
    #[inline]
    pub fn sampler(unit: i32) -> Self {
        UniformValue::Sampler2D(unit)
    }

    /// Returns the type tag of this value.
    pub fn ty(&self) -> UniformType {
        match self {
            UniformValue::Bool(_) => UniformType::Bool,
            UniformValue::Int(_) => UniformType::Int,
            UniformValue::Float(_) => UniformType::Float,
            UniformValue::Vec2(_) => UniformType::Vec2,
            UniformValue::Vec3(_) => UniformType::Vec3,
            UniformValue::Vec4(_) => UniformType::Vec4,
            UniformValue::Mat4(_) => UniformType::Mat4,
            UniformValue::Sampler2D(_) => UniformType::Sampler2D,
        }
    }

    #[inline]
    pub fn matches(&self, ty: UniformType) -> bool {
        self.ty() == ty
    }
}

impl From<bool> for UniformValue {
    fn from(v: bool) -> Self {
        UniformValue::Bool(v)
    }
}

impl From<i32> for UniformValue {
    fn from(v: i32) -> Self {
        UniformValue::Int(v)
    }
}

impl From<f32> for UniformValue {
    fn from(v: f32) -> Self {
        UniformValue::Float(v)
    }
}

impl From<Vec2> for UniformValue {
    fn from(v: Vec2) -> Self {
        UniformValue::Vec2(v)
    }
}

impl From<Vec3> for UniformValue {
    fn from(v: Vec3) -> Self {
        UniformValue::Vec3(v)
    }
}

impl From<Vec4> for UniformValue {
    fn from(v: Vec4) -> Self {
        UniformValue::Vec4(v)
    }
}

impl From<Mat4> for UniformValue {
    fn from(v: Mat4) -> Self {
        UniformValue::Mat4(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conversions_pick_the_natural_variant() {
        assert_eq!(UniformValue::from(true).ty(), UniformType::Bool);
        assert_eq!(UniformValue::from(7).ty(), UniformType::Int);
        assert_eq!(UniformValue::from(3.5f32).ty(), UniformType::Float);
        assert_eq!(UniformValue::from(Vec3::ONE).ty(), UniformType::Vec3);
        assert_eq!(UniformValue::from(Mat4::IDENTITY).ty(), UniformType::Mat4);
    }

    #[test]
    fn integer_is_not_a_sampler() {
        assert!(!UniformValue::from(0).matches(UniformType::Sampler2D));
        assert!(UniformValue::sampler(0).matches(UniformType::Sampler2D));
    }

    #[test]
    fn block_sizes_and_alignment() {
        assert_eq!(UniformType::Vec3.size(), 12);
        assert_eq!(UniformType::Vec3.align(), 16);
        assert_eq!(UniformType::Mat4.size(), 64);
        assert_eq!(UniformType::Bool.align(), 4);
    }

    #[test]
    fn display_uses_shader_names() {
        assert_eq!(UniformType::Sampler2D.to_string(), "sampler2D");
        assert_eq!(UniformType::Mat4.to_string(), "mat4");
    }
}
