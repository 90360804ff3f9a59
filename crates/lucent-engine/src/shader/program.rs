use std::collections::HashSet;
use std::fmt;

use crate::render::UniformSink;

use super::error::{ShaderError, UniformError};
use super::layout::{UniformLayout, MAX_UNIFORM_BLOCK_SIZE};
use super::slot::UniformSlot;
use super::value::{UniformType, UniformValue};

/// Identifier of a registered shader program.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct ShaderId(u32);

impl ShaderId {
    pub(crate) const fn new(raw: u32) -> Self {
        Self(raw)
    }

    pub fn raw(self) -> u32 {
        self.0
    }
}

impl fmt::Display for ShaderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "shader#{}", self.0)
    }
}

/// Shader program description: WGSL source plus the uniforms it expects.
///
/// Uniforms must be declared in the same order as the members of the
/// `@group(0) @binding(0)` uniform struct in the source. `bool` members are
/// declared as `i32` on the WGSL side.
#[derive(Debug, Clone)]
pub struct ShaderDesc {
    pub name: String,
    pub source: String,
    pub uniforms: Vec<(String, UniformType)>,
}

impl ShaderDesc {
    pub fn new(name: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            source: source.into(),
            uniforms: Vec::new(),
        }
    }

    pub fn uniform(mut self, name: impl Into<String>, ty: UniformType) -> Self {
        self.uniforms.push((name.into(), ty));
        self
    }
}

/// A shader program known to the engine.
///
/// Holds the program's declared uniforms as slots. Values set here are
/// program-wide and are uploaded every time the program is used for a draw,
/// before any per-mesh values.
#[derive(Debug)]
pub struct ShaderProgram {
    id: ShaderId,
    name: String,
    source: String,
    layout: UniformLayout,
    params: Vec<UniformSlot>,
}

impl ShaderProgram {
    pub(crate) fn from_desc(id: ShaderId, desc: ShaderDesc) -> Result<Self, ShaderError> {
        let mut seen = HashSet::new();
        for (name, _) in &desc.uniforms {
            if !seen.insert(name.as_str()) {
                return Err(ShaderError::DuplicateUniform {
                    shader: desc.name.clone(),
                    name: name.clone(),
                });
            }
        }

        let layout = UniformLayout::new(desc.uniforms.iter().map(|(n, t)| (n.as_str(), *t)));
        if layout.size() > MAX_UNIFORM_BLOCK_SIZE {
            return Err(ShaderError::BlockTooLarge {
                shader: desc.name,
                size: layout.size(),
                max: MAX_UNIFORM_BLOCK_SIZE,
            });
        }

        let params = desc
            .uniforms
            .iter()
            .map(|(n, t)| UniformSlot::new(n.clone(), *t, id, desc.name.clone()))
            .collect();

        Ok(Self {
            id,
            name: desc.name,
            source: desc.source,
            layout,
            params,
        })
    }

    pub fn id(&self) -> ShaderId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn layout(&self) -> &UniformLayout {
        &self.layout
    }

    pub fn params(&self) -> &[UniformSlot] {
        &self.params
    }

    pub fn param(&self, name: &str) -> Option<&UniformSlot> {
        self.params.iter().find(|p| p.name() == name)
    }

    /// Fresh per-mesh slots for every declared uniform.
    pub fn instance_slots(&self) -> Vec<UniformSlot> {
        self.params.iter().map(UniformSlot::fresh_copy).collect()
    }

    /// Takes the value of `slot` as the program-wide value for its uniform.
    pub fn set_param(&mut self, slot: &UniformSlot) -> Result<(), UniformError> {
        let Some(value) = slot.value() else {
            return Err(UniformError::NotSet { name: slot.name().to_string() });
        };
        self.set(slot.name(), value)
    }

    /// Sets a program-wide uniform value by name.
    pub fn set(&mut self, name: &str, value: impl Into<UniformValue>) -> Result<(), UniformError> {
        match self.params.iter_mut().find(|p| p.name() == name) {
            Some(p) => p.set(value),
            None => {
                let err = UniformError::UniformNotFound {
                    name: name.to_string(),
                    shader: self.name.clone(),
                };
                log::error!("{err}");
                Err(err)
            }
        }
    }

    /// Uploads every program-wide value that has been set.
    ///
    /// A failing uniform is logged and skipped; the others are still uploaded.
    pub fn push_params<S>(&mut self, sink: &mut S)
    where
        S: UniformSink + ?Sized,
    {
        for p in self.params.iter_mut().filter(|p| p.is_set()) {
            let _ = p.push_to_graphics(sink);
        }
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec4;

    use super::*;
    use crate::render::testing::{RecordingGraphics, Upload};

    fn desc() -> ShaderDesc {
        ShaderDesc::new("basic", "// wgsl")
            .uniform("u_tint", UniformType::Vec4)
            .uniform("u_time", UniformType::Float)
    }

    #[test]
    fn declared_uniforms_become_slots() {
        let program = ShaderProgram::from_desc(ShaderId::new(3), desc()).unwrap();
        assert_eq!(program.params().len(), 2);
        assert_eq!(program.param("u_time").map(|p| p.declared_type()), Some(UniformType::Float));
        assert_eq!(program.layout().location("u_time").map(|l| l.0), Some(16));
        assert!(program.params().iter().all(|p| p.owner() == ShaderId::new(3)));
    }

    #[test]
    fn duplicate_uniform_is_rejected() {
        let d = desc().uniform("u_time", UniformType::Float);
        let err = ShaderProgram::from_desc(ShaderId::new(1), d).unwrap_err();
        assert!(matches!(err, ShaderError::DuplicateUniform { .. }));
    }

    #[test]
    fn oversized_block_is_rejected() {
        let mut d = ShaderDesc::new("huge", "");
        for i in 0..5 {
            d = d.uniform(format!("m{i}"), UniformType::Mat4);
        }
        let err = ShaderProgram::from_desc(ShaderId::new(1), d).unwrap_err();
        assert_eq!(
            err,
            ShaderError::BlockTooLarge { shader: "huge".into(), size: 320, max: 256 }
        );
    }

    #[test]
    fn slot_pushes_to_owning_program() {
        let mut program = ShaderProgram::from_desc(ShaderId::new(1), desc()).unwrap();

        let mut slot = program.instance_slots().remove(0);
        assert!(matches!(slot.push_to_owner(&mut program), Err(UniformError::NotSet { .. })));

        slot.set(Vec4::ONE).unwrap();
        slot.push_to_owner(&mut program).unwrap();
        assert_eq!(program.param("u_tint").and_then(|p| p.value()), Some(UniformValue::Vec4(Vec4::ONE)));
    }

    #[test]
    fn slot_from_other_program_is_not_found() {
        let mut a = ShaderProgram::from_desc(ShaderId::new(1), desc()).unwrap();
        let b = ShaderProgram::from_desc(ShaderId::new(2), desc()).unwrap();

        let mut foreign = b.instance_slots().remove(1);
        foreign.set(1.0f32).unwrap();
        assert!(matches!(
            foreign.push_to_owner(&mut a),
            Err(UniformError::UniformNotFound { .. })
        ));
    }

    #[test]
    fn push_params_uploads_only_set_values() {
        let mut program = ShaderProgram::from_desc(ShaderId::new(1), desc()).unwrap();
        program.set("u_time", 2.0f32).unwrap();
        assert!(program.set("u_missing", 1.0f32).is_err());

        let mut gfx = RecordingGraphics::new()
            .with_uniform(ShaderId::new(1), "u_tint", 0)
            .with_uniform(ShaderId::new(1), "u_time", 16);
        program.push_params(&mut gfx);

        assert_eq!(gfx.uploads, vec![Upload::F32(16, 2.0)]);
    }
}
