use crate::render::{UniformLocation, UniformSink};

use super::error::UniformError;
use super::program::{ShaderId, ShaderProgram};
use super::value::{UniformType, UniformValue};

/// A named, type-tagged uniform value bound to one shader program.
///
/// The uniform location is resolved lazily on the first upload and reused
/// afterwards. A failed lookup clears it so the next upload asks again
/// (e.g. after the program was rebuilt).
#[derive(Debug, Clone)]
pub struct UniformSlot {
    name: String,
    owner: ShaderId,
    owner_name: String,
    declared: UniformType,
    value: Option<UniformValue>,
    location: Option<UniformLocation>,
}

impl UniformSlot {
    pub fn new(
        name: impl Into<String>,
        declared: UniformType,
        owner: ShaderId,
        owner_name: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            owner,
            owner_name: owner_name.into(),
            declared,
            value: None,
            location: None,
        }
    }

    /// Copy of this declaration without a value or a resolved location.
    pub fn fresh_copy(&self) -> Self {
        Self {
            name: self.name.clone(),
            owner: self.owner,
            owner_name: self.owner_name.clone(),
            declared: self.declared,
            value: None,
            location: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn owner(&self) -> ShaderId {
        self.owner
    }

    pub fn declared_type(&self) -> UniformType {
        self.declared
    }

    pub fn value(&self) -> Option<UniformValue> {
        self.value
    }

    pub fn cached_location(&self) -> Option<UniformLocation> {
        self.location
    }

    pub fn is_set(&self) -> bool {
        self.value.is_some()
    }

    /// Stores `value` if its variant matches the declared type.
    ///
    /// On mismatch the stored value is left unchanged.
    pub fn set(&mut self, value: impl Into<UniformValue>) -> Result<(), UniformError> {
        let value = value.into();
        if !value.matches(self.declared) {
            let err = UniformError::TypeMismatch {
                name: self.name.clone(),
                expected: self.declared,
                got: value.ty(),
            };
            log::error!("{err}");
            return Err(err);
        }
        self.value = Some(value);
        Ok(())
    }

    /// Like [`set`](Self::set) for values that may be absent.
    pub fn assign(&mut self, value: Option<UniformValue>) -> Result<(), UniformError> {
        match value {
            Some(v) => self.set(v),
            None => {
                let err = UniformError::NullValue { name: self.name.clone() };
                log::error!("{err}");
                Err(err)
            }
        }
    }

    /// Hands the current value to the owning program, which keeps it as its
    /// program-wide value for this uniform.
    pub fn push_to_owner(&self, program: &mut ShaderProgram) -> Result<(), UniformError> {
        if !self.is_set() {
            let err = UniformError::NotSet { name: self.name.clone() };
            log::error!("cannot push to shader `{}`: {err}", self.owner_name);
            return Err(err);
        }
        if program.id() != self.owner {
            let err = UniformError::UniformNotFound {
                name: self.name.clone(),
                shader: program.name().to_string(),
            };
            log::error!("{err}");
            return Err(err);
        }
        program.set_param(self)
    }

    /// Uploads the current value through `sink`.
    pub fn push_to_graphics<S>(&mut self, sink: &mut S) -> Result<(), UniformError>
    where
        S: UniformSink + ?Sized,
    {
        let Some(value) = self.value else {
            let err = UniformError::NotSet { name: self.name.clone() };
            log::error!("{err}");
            return Err(err);
        };

        let location = match self.location {
            Some(loc) => loc,
            None => match sink.uniform_location(self.owner, &self.name) {
                Some(loc) => {
                    self.location = Some(loc);
                    loc
                }
                None => {
                    self.location = None;
                    let err = UniformError::UniformNotFound {
                        name: self.name.clone(),
                        shader: self.owner_name.clone(),
                    };
                    log::error!("{err}");
                    return Err(err);
                }
            },
        };

        match (self.declared, value) {
            (UniformType::Bool, UniformValue::Bool(b)) => sink.uniform_i32(location, b as i32),
            (UniformType::Int, UniformValue::Int(i)) => sink.uniform_i32(location, i),
            (UniformType::Sampler2D, UniformValue::Sampler2D(unit)) => {
                sink.uniform_i32(location, unit)
            }
            (UniformType::Float, UniformValue::Float(f)) => sink.uniform_f32(location, f),
            (UniformType::Vec2, UniformValue::Vec2(v)) => sink.uniform_vec2(location, v),
            (UniformType::Vec3, UniformValue::Vec3(v)) => sink.uniform_vec3(location, v),
            (UniformType::Vec4, UniformValue::Vec4(v)) => sink.uniform_vec4(location, v),
            (UniformType::Mat4, UniformValue::Mat4(m)) => {
                let cols: [f32; 16] = m.to_cols_array();
                sink.uniform_mat4(location, &cols);
            }
            // `set` rejects mismatched variants.
            (declared, got) => {
                return Err(UniformError::TypeMismatch {
                    name: self.name.clone(),
                    expected: declared,
                    got: got.ty(),
                });
            }
        }

        Ok(())
    }
}
