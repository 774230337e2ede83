// Copyright 2025 the Vector Sprite Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Compiling and linking WGSL stage sources with naga.
//!
//! Building a program is strictly ordered: the vertex stage is parsed and validated,
//! then the fragment stage, then the two are linked. The first failure stops the build,
//! so there is never a partially built program.
//!
//! Linking checks what a GPU driver would check when linking a GL program: the vertex
//! stage writes a clip space position, every fragment input is written by the vertex
//! stage with the same type, the fragment stage writes a colour, and resources visible
//! to both stages agree. On success the program can be queried for attribute locations
//! and uniform bindings by name.

use core::fmt;

use naga::front::wgsl;
use naga::valid::{Capabilities, ModuleInfo, ValidationFlags, Validator};
use naga::{
    AddressSpace, Binding, BuiltIn, Handle, Module, Scalar, ScalarKind, Type, TypeInner,
    VectorSize,
};
use thiserror::Error;

use crate::ShaderSources;

/// Pipeline stage a shader source is written for.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl ShaderStage {
    pub const fn name(self) -> &'static str {
        match self {
            Self::Vertex => "vertex",
            Self::Fragment => "fragment",
        }
    }

    fn to_naga(self) -> naga::ShaderStage {
        match self {
            Self::Vertex => naga::ShaderStage::Vertex,
            Self::Fragment => naga::ShaderStage::Fragment,
        }
    }
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A stage failed to parse or validate.
    #[error("{stage} shader failed to compile:\n{diagnostic}")]
    Compile {
        stage: ShaderStage,
        diagnostic: String,
    },
    /// The stages compiled on their own but do not fit together.
    #[error("program failed to link:\n{0}")]
    Link(String),
    #[error("vertex attribute `{0}` not found in program")]
    MissingAttribute(String),
    #[error("uniform `{0}` not found in program")]
    MissingUniform(String),
}

impl Error {
    fn compile(stage: ShaderStage, diagnostic: String) -> Self {
        let diagnostic = if diagnostic.trim().is_empty() {
            format!("Failed to compile {stage} shader")
        } else {
            diagnostic
        };
        Self::Compile { stage, diagnostic }
    }

    fn link(diagnostic: String) -> Self {
        if diagnostic.trim().is_empty() {
            Self::Link("Failed to link program".into())
        } else {
            Self::Link(diagnostic)
        }
    }
}

/// A single validated shader stage.
#[derive(Debug)]
pub struct CompiledShader {
    stage: ShaderStage,
    source: String,
    module: Module,
    info: ModuleInfo,
    entry_point: usize,
}

impl CompiledShader {
    /// Parses and validates `source`, which must contain exactly one entry point for `stage`.
    pub fn compile(stage: ShaderStage, source: impl Into<String>) -> Result<Self, Error> {
        let source = source.into();
        log::debug!("compiling {stage} shader");
        let module =
            wgsl::parse_str(&source).map_err(|e| Error::compile(stage, e.emit_to_string(&source)))?;
        let info = Validator::new(ValidationFlags::all(), Capabilities::empty())
            .validate(&module)
            .map_err(|e| Error::compile(stage, e.emit_to_string(&source)))?;
        let entry_point = {
            let mut candidates = module
                .entry_points
                .iter()
                .enumerate()
                .filter(|(_, entry)| entry.stage == stage.to_naga());
            match (candidates.next(), candidates.next()) {
                (Some((index, _)), None) => index,
                (None, _) => {
                    return Err(Error::compile(stage, format!("no @{stage} entry point")));
                }
                (Some(_), Some(_)) => {
                    return Err(Error::compile(
                        stage,
                        format!("more than one @{stage} entry point"),
                    ));
                }
            }
        };
        Ok(Self {
            stage,
            source,
            module,
            info,
            entry_point,
        })
    }

    pub fn stage(&self) -> ShaderStage {
        self.stage
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn module(&self) -> &Module {
        &self.module
    }

    /// Name of the stage's entry point function.
    pub fn entry_point(&self) -> &str {
        &self.module.entry_points[self.entry_point].name
    }

    /// User defined (`@location`) inputs of the entry point.
    fn inputs(&self) -> Vec<Varying> {
        let function = &self.module.entry_points[self.entry_point].function;
        let mut varyings = Vec::new();
        for argument in &function.arguments {
            collect_varyings(
                &self.module,
                argument.name.as_deref(),
                argument.ty,
                argument.binding.as_ref(),
                &mut varyings,
            );
        }
        varyings
    }

    /// User defined (`@location`) outputs of the entry point, and whether it writes
    /// `@builtin(position)`.
    fn outputs(&self) -> (Vec<Varying>, bool) {
        let function = &self.module.entry_points[self.entry_point].function;
        let mut varyings = Vec::new();
        let Some(result) = &function.result else {
            return (varyings, false);
        };
        collect_varyings(
            &self.module,
            None,
            result.ty,
            result.binding.as_ref(),
            &mut varyings,
        );
        let writes_position = writes_position(&self.module, result.ty, result.binding.as_ref());
        (varyings, writes_position)
    }

    /// Uniform buffers read by the entry point.
    fn uniforms(&self) -> Vec<UniformBinding> {
        let usage = self.info.get_entry_point(self.entry_point);
        let mut uniforms = Vec::new();
        for (handle, var) in self.module.global_variables.iter() {
            if usage[handle].is_empty() || var.space != AddressSpace::Uniform {
                continue;
            }
            let Some(binding) = &var.binding else {
                continue;
            };
            uniforms.push(UniformBinding {
                name: var.name.clone().unwrap_or_default(),
                group: binding.group,
                binding: binding.binding,
                size: self.module.types[var.ty].inner.size(self.module.to_ctx()),
                ty: describe_type(&self.module, var.ty),
            });
        }
        uniforms
    }
}

/// A user defined value passed between stages or from vertex buffers.
#[derive(Clone, Debug, PartialEq, Eq)]
struct Varying {
    name: String,
    location: u32,
    ty: String,
}

fn collect_varyings(
    module: &Module,
    name: Option<&str>,
    ty: Handle<Type>,
    binding: Option<&Binding>,
    out: &mut Vec<Varying>,
) {
    match binding {
        Some(Binding::Location { location, .. }) => out.push(Varying {
            name: name.unwrap_or_default().to_owned(),
            location: *location,
            ty: describe_type(module, ty),
        }),
        Some(Binding::BuiltIn(_)) => {}
        None => {
            if let TypeInner::Struct { members, .. } = &module.types[ty].inner {
                for member in members {
                    collect_varyings(
                        module,
                        member.name.as_deref(),
                        member.ty,
                        member.binding.as_ref(),
                        out,
                    );
                }
            }
        }
    }
}

fn writes_position(module: &Module, ty: Handle<Type>, binding: Option<&Binding>) -> bool {
    match binding {
        Some(Binding::BuiltIn(BuiltIn::Position { .. })) => true,
        Some(_) => false,
        None => match &module.types[ty].inner {
            TypeInner::Struct { members, .. } => members
                .iter()
                .any(|member| writes_position(module, member.ty, member.binding.as_ref())),
            _ => false,
        },
    }
}

/// WGSL-like spelling of a type, comparable across modules.
fn describe_type(module: &Module, ty: Handle<Type>) -> String {
    fn scalar(s: Scalar) -> String {
        match (s.kind, s.width) {
            (ScalarKind::Float, 4) => "f32".into(),
            (ScalarKind::Float, 8) => "f64".into(),
            (ScalarKind::Sint, 4) => "i32".into(),
            (ScalarKind::Uint, 4) => "u32".into(),
            (ScalarKind::Bool, _) => "bool".into(),
            (kind, width) => format!("{kind:?}{}", u32::from(width) * 8),
        }
    }
    fn size(s: VectorSize) -> u32 {
        match s {
            VectorSize::Bi => 2,
            VectorSize::Tri => 3,
            VectorSize::Quad => 4,
        }
    }
    match &module.types[ty].inner {
        TypeInner::Scalar(s) => scalar(*s),
        TypeInner::Vector { size: n, scalar: s } => format!("vec{}<{}>", size(*n), scalar(*s)),
        TypeInner::Matrix {
            columns,
            rows,
            scalar: s,
        } => format!("mat{}x{}<{}>", size(*columns), size(*rows), scalar(*s)),
        TypeInner::Struct { members, .. } => {
            let fields = members
                .iter()
                .map(|member| describe_type(module, member.ty))
                .collect::<Vec<_>>();
            format!("struct {{ {} }}", fields.join(", "))
        }
        other => format!("{other:?}"),
    }
}

/// A vertex shader input resolved by name.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VertexAttribute {
    pub name: String,
    pub location: u32,
    /// WGSL spelling of the attribute type, such as `vec2<f32>`.
    pub ty: String,
}

/// A uniform buffer binding resolved by name.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UniformBinding {
    pub name: String,
    pub group: u32,
    pub binding: u32,
    /// Size of the bound type in bytes.
    pub size: u32,
    pub ty: String,
}

/// A linked vertex and fragment stage pair.
#[derive(Debug)]
pub struct Program {
    vertex: CompiledShader,
    fragment: CompiledShader,
    attributes: Vec<VertexAttribute>,
    uniforms: Vec<UniformBinding>,
}

impl Program {
    /// Links two compiled stages, collecting every interface problem into one diagnostic.
    pub fn link(vertex: CompiledShader, fragment: CompiledShader) -> Result<Self, Error> {
        log::debug!("linking program");
        let mut problems = Vec::new();
        if vertex.stage != ShaderStage::Vertex {
            problems.push(format!("{} shader attached as the vertex stage", vertex.stage));
        }
        if fragment.stage != ShaderStage::Fragment {
            problems.push(format!("{} shader attached as the fragment stage", fragment.stage));
        }
        if !problems.is_empty() {
            return Err(Error::link(problems.join("\n")));
        }

        let (vertex_outputs, writes_position) = vertex.outputs();
        if !writes_position {
            problems.push("vertex shader does not write @builtin(position)".to_owned());
        }
        for input in fragment.inputs() {
            match vertex_outputs.iter().find(|o| o.location == input.location) {
                None => problems.push(format!(
                    "fragment input `{}` at @location({}) is not written by the vertex shader",
                    input.name, input.location
                )),
                Some(output) if output.ty != input.ty => problems.push(format!(
                    "fragment input `{}` at @location({}) is {}, but the vertex shader writes {}",
                    input.name, input.location, input.ty, output.ty
                )),
                Some(_) => {}
            }
        }
        if fragment.outputs().0.is_empty() {
            problems.push("fragment shader writes no colour output".to_owned());
        }

        let mut uniforms: Vec<UniformBinding> = Vec::new();
        for uniform in vertex.uniforms().into_iter().chain(fragment.uniforms()) {
            let existing = uniforms
                .iter()
                .find(|u| (u.group, u.binding) == (uniform.group, uniform.binding));
            match existing {
                None => uniforms.push(uniform),
                Some(existing) if existing.name != uniform.name || existing.ty != uniform.ty => {
                    problems.push(format!(
                        "@group({}) @binding({}) is `{}: {}` in one stage and `{}: {}` in the other",
                        uniform.group,
                        uniform.binding,
                        existing.name,
                        existing.ty,
                        uniform.name,
                        uniform.ty
                    ));
                }
                Some(_) => {}
            }
        }
        if !problems.is_empty() {
            return Err(Error::link(problems.join("\n")));
        }

        let attributes = vertex
            .inputs()
            .into_iter()
            .map(|varying| VertexAttribute {
                name: varying.name,
                location: varying.location,
                ty: varying.ty,
            })
            .collect();
        Ok(Self {
            vertex,
            fragment,
            attributes,
            uniforms,
        })
    }

    pub fn vertex(&self) -> &CompiledShader {
        &self.vertex
    }

    pub fn fragment(&self) -> &CompiledShader {
        &self.fragment
    }

    pub fn attributes(&self) -> &[VertexAttribute] {
        &self.attributes
    }

    pub fn uniforms(&self) -> &[UniformBinding] {
        &self.uniforms
    }

    /// Looks up a vertex attribute by name.
    pub fn attribute(&self, name: &str) -> Result<&VertexAttribute, Error> {
        self.attributes
            .iter()
            .find(|attribute| attribute.name == name)
            .ok_or_else(|| Error::MissingAttribute(name.to_owned()))
    }

    /// Looks up a uniform binding by name.
    pub fn uniform(&self, name: &str) -> Result<&UniformBinding, Error> {
        self.uniforms
            .iter()
            .find(|uniform| uniform.name == name)
            .ok_or_else(|| Error::MissingUniform(name.to_owned()))
    }
}

/// Compiles the vertex stage, then the fragment stage, then links them.
pub fn build_program(sources: ShaderSources<'_>) -> Result<Program, Error> {
    let vertex = CompiledShader::compile(ShaderStage::Vertex, sources.vertex)?;
    let fragment = CompiledShader::compile(ShaderStage::Fragment, sources.fragment)?;
    Program::link(vertex, fragment)
}
