//! Deck writer: the symmetric counterpart of `rad_deck::DeckReader`.
//!
//! Sections are emitted in a fixed order (header, title, nodes, elements by
//! topology, materials, properties, loads, boundary conditions). Reals use
//! fixed-width scientific notation, so a written deck reads back equal to the
//! model within the configured number of decimals.

use std::fmt::Display;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use rad_deck::ElementType;
use rad_deck::grammar::DOF_SEPARATOR;
use rad_model::Model;

use crate::error::Result;

/// Written in place of an empty type tag so the line keeps its token layout.
pub const UNDEFINED_TAG: &str = "UNDEFINED";

/// Writer configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WriterOptions {
    /// Digits after the decimal point for reals
    pub precision: usize,
    /// Field width for integer ids
    pub id_width: usize,
    /// Field width for reals
    pub real_width: usize,
}

impl Default for WriterOptions {
    fn default() -> Self {
        Self {
            precision: 6,
            id_width: 10,
            real_width: 20,
        }
    }
}

pub fn write_model<W: Write>(writer: W, model: &Model, options: &WriterOptions) -> Result<()> {
    let mut ctx = DeckWriter::new(writer, *options);
    ctx.write_header(model)?;
    ctx.write_title(model)?;
    ctx.write_nodes(model)?;
    ctx.write_elements(model)?;
    ctx.write_materials(model)?;
    ctx.write_properties(model)?;
    ctx.write_load_cases(model)?;
    ctx.write_boundary_conditions(model)?;
    ctx.finish()
}

pub fn write_model_file(path: impl AsRef<Path>, model: &Model, options: &WriterOptions) -> Result<()> {
    let file = File::create(path)?;
    write_model(BufWriter::new(file), model, options)
}

pub fn write_model_string(model: &Model, options: &WriterOptions) -> Result<String> {
    let mut buf = Vec::new();
    write_model(&mut buf, model, options)?;
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

struct DeckWriter<W> {
    writer: W,
    options: WriterOptions,
    line: String,
}

impl<W: Write> DeckWriter<W> {
    fn new(writer: W, options: WriterOptions) -> Self {
        Self {
            writer,
            options,
            line: String::new(),
        }
    }

    fn write_header(&mut self, model: &Model) -> Result<()> {
        match model.version() {
            Some(version) => writeln!(self.writer, "#RADIOSS STARTER version {version}")?,
            None => writeln!(self.writer, "#RADIOSS STARTER")?,
        }
        writeln!(self.writer, "/BEGIN")?;
        Ok(())
    }

    fn write_title(&mut self, model: &Model) -> Result<()> {
        if !model.title().is_empty() {
            writeln!(self.writer, "/TITLE\n{}", model.title())?;
        }
        Ok(())
    }

    fn write_nodes(&mut self, model: &Model) -> Result<()> {
        if model.nodes().is_empty() {
            return Ok(());
        }
        writeln!(self.writer, "/NODE")?;
        for node in model.nodes() {
            self.begin_line();
            self.id(node.id);
            for c in node.position {
                self.real(c);
            }
            self.end_line()?;
        }
        Ok(())
    }

    fn write_elements(&mut self, model: &Model) -> Result<()> {
        for topology in ElementType::ALL {
            let mut elements = model.elements_of_type(topology).peekable();
            if elements.peek().is_none() {
                continue;
            }
            writeln!(self.writer, "/{}", topology.keyword())?;
            for element in elements {
                self.begin_line();
                self.id(element.id);
                self.id(element.material_id.unwrap_or(0));
                self.id(element.property_id.unwrap_or(0));
                for node in &element.node_ids {
                    self.id(*node);
                }
                self.end_line()?;
            }
        }
        Ok(())
    }

    fn write_materials(&mut self, model: &Model) -> Result<()> {
        for material in model.materials() {
            let law = tag(&material.law);
            writeln!(self.writer, "/MAT/{law}")?;
            self.begin_line();
            self.id(material.id);
            self.word(&law);
            for (name, value) in &material.properties {
                self.word(&tag(name));
                self.real(*value);
            }
            self.end_line()?;
        }
        Ok(())
    }

    fn write_properties(&mut self, model: &Model) -> Result<()> {
        for property in model.properties() {
            let kind = tag(&property.kind);
            writeln!(self.writer, "/PROP/{kind}")?;
            self.begin_line();
            self.id(property.id);
            self.word(&kind);
            for (name, value) in &property.values {
                self.word(&tag(name));
                self.real(*value);
            }
            self.end_line()?;
        }
        Ok(())
    }

    fn write_load_cases(&mut self, model: &Model) -> Result<()> {
        if model.load_cases().is_empty() {
            return Ok(());
        }
        writeln!(self.writer, "/CLOAD")?;
        for load in model.load_cases() {
            self.begin_line();
            self.id(load.id);
            self.word(&tag(&load.kind));
            self.real(load.magnitude);
            for c in load.direction {
                self.real(c);
            }
            for node in &load.node_ids {
                self.id(*node);
            }
            self.end_line()?;
        }
        Ok(())
    }

    fn write_boundary_conditions(&mut self, model: &Model) -> Result<()> {
        if model.boundary_conditions().is_empty() {
            return Ok(());
        }
        writeln!(self.writer, "/BCS")?;
        for condition in model.boundary_conditions() {
            self.begin_line();
            self.id(condition.id);
            self.word(&tag(&condition.kind));
            if !condition.dofs.is_empty() {
                let packed: String = condition.dofs.iter().map(|d| d.to_string()).collect();
                self.word(&packed);
            }
            self.word(DOF_SEPARATOR);
            for node in &condition.node_ids {
                self.id(*node);
            }
            self.end_line()?;
        }
        Ok(())
    }

    fn finish(mut self) -> Result<()> {
        writeln!(self.writer, "/END")?;
        self.writer.flush()?;
        Ok(())
    }

    fn begin_line(&mut self) {
        self.line.clear();
    }

    fn end_line(&mut self) -> Result<()> {
        writeln!(self.writer, "{}", self.line)?;
        Ok(())
    }

    fn id(&mut self, value: i32) {
        let width = self.options.id_width;
        self.field(value, width);
    }

    fn real(&mut self, value: f64) {
        let rendered = format!("{:.*e}", self.options.precision, value);
        let width = self.options.real_width;
        self.field(rendered, width);
    }

    fn word(&mut self, value: &str) {
        self.line.push(' ');
        self.line.push_str(value);
    }

    /// Right-aligns `value` in `width`, keeping at least one separating space.
    fn field(&mut self, value: impl Display, width: usize) {
        let rendered = value.to_string();
        if !self.line.is_empty() && rendered.len() >= width {
            self.line.push(' ');
        }
        for _ in rendered.len()..width {
            self.line.push(' ');
        }
        self.line.push_str(&rendered);
    }
}

/// Type tags and attribute names must stay a single token.
fn tag(raw: &str) -> String {
    let cleaned: String = raw
        .trim()
        .chars()
        .map(|c| if c.is_whitespace() || c == ',' || c == '/' { '_' } else { c })
        .collect();
    if cleaned.is_empty() {
        UNDEFINED_TAG.to_string()
    } else {
        cleaned
    }
}
