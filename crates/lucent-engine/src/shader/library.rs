use std::collections::HashMap;

use super::error::ShaderError;
use super::program::{ShaderDesc, ShaderId, ShaderProgram};

/// Registry of shader programs, addressable by id or by name.
#[derive(Debug, Default)]
pub struct ShaderLibrary {
    programs: Vec<ShaderProgram>,
    by_name: HashMap<String, ShaderId>,
}

impl ShaderLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, desc: ShaderDesc) -> Result<ShaderId, ShaderError> {
        if self.by_name.contains_key(&desc.name) {
            return Err(ShaderError::DuplicateName(desc.name));
        }

        let id = ShaderId::new(self.programs.len() as u32 + 1);
        let program = ShaderProgram::from_desc(id, desc)?;

        log::debug!("registered shader `{}` as {id}", program.name());
        self.by_name.insert(program.name().to_string(), id);
        self.programs.push(program);
        Ok(id)
    }

    pub fn get(&self, id: ShaderId) -> Option<&ShaderProgram> {
        self.programs.get(index(id)?)
    }

    pub fn get_mut(&mut self, id: ShaderId) -> Option<&mut ShaderProgram> {
        let i = index(id)?;
        self.programs.get_mut(i)
    }

    pub fn id_of(&self, name: &str) -> Option<ShaderId> {
        self.by_name.get(name).copied()
    }

    pub fn by_name(&self, name: &str) -> Option<&ShaderProgram> {
        self.get(self.id_of(name)?)
    }

    pub fn by_name_mut(&mut self, name: &str) -> Option<&mut ShaderProgram> {
        let id = self.id_of(name)?;
        self.get_mut(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ShaderProgram> {
        self.programs.iter()
    }

    pub fn len(&self) -> usize {
        self.programs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.programs.is_empty()
    }
}

#[inline]
fn index(id: ShaderId) -> Option<usize> {
    (id.raw() as usize).checked_sub(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shader::UniformType;

    #[test]
    fn lookup_by_id_and_name() {
        let mut lib = ShaderLibrary::new();
        let a = lib.register(ShaderDesc::new("flat", "")).unwrap();
        let b = lib
            .register(ShaderDesc::new("tinted", "").uniform("u_tint", UniformType::Vec4))
            .unwrap();

        assert_ne!(a, b);
        assert_eq!(lib.id_of("tinted"), Some(b));
        assert_eq!(lib.get(b).map(|p| p.name()), Some("tinted"));
        assert_eq!(lib.by_name("flat").map(|p| p.id()), Some(a));
        assert!(lib.by_name("nope").is_none());
        assert_eq!(lib.len(), 2);

        lib.by_name_mut("tinted")
            .unwrap()
            .set("u_tint", glam::Vec4::ONE)
            .unwrap();
        assert!(lib.get(b).unwrap().param("u_tint").unwrap().is_set());
    }

    #[test]
    fn duplicate_name_is_rejected() {
        let mut lib = ShaderLibrary::new();
        lib.register(ShaderDesc::new("flat", "")).unwrap();
        assert_eq!(
            lib.register(ShaderDesc::new("flat", "")),
            Err(ShaderError::DuplicateName("flat".into()))
        );
        assert_eq!(lib.len(), 1);
    }

    #[test]
    fn invalid_desc_does_not_consume_an_id() {
        let mut lib = ShaderLibrary::new();
        let bad = ShaderDesc::new("bad", "")
            .uniform("x", UniformType::Int)
            .uniform("x", UniformType::Int);
        assert!(lib.register(bad).is_err());
        let ok = lib.register(ShaderDesc::new("ok", "")).unwrap();
        assert_eq!(ok.raw(), 1);
    }
}
