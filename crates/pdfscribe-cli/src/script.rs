//! JSON drawing scripts.
//!
//! A script is an object with optional layout `options` and a list of
//! `steps`, each naming one session operation in its `op` field:
//!
//! ```json
//! {
//!   "options": { "line_height": 16.0 },
//!   "steps": [
//!     { "op": "begin_page", "width": 612, "height": 792 },
//!     { "op": "set_font", "name": "Helvetica", "size": 12 },
//!     { "op": "show_xy", "text": "Hello", "x": 72, "y": 720 }
//!   ]
//! }
//! ```

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use pdfscribe::{ImageId, PdfError, Session, SessionOptions};
use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Script {
    #[serde(default)]
    pub options: SessionOptions,
    pub steps: Vec<Step>,
}

fn default_encoding() -> String {
    "host".to_string()
}

fn default_scale() -> f64 {
    1.0
}

/// One session call.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case", deny_unknown_fields)]
pub enum Step {
    BeginPage {
        width: f64,
        height: f64,
    },
    EndPage,
    Close,
    SetInfo {
        key: String,
        value: String,
    },
    AddOutline {
        title: String,
    },
    SetFont {
        name: String,
        size: f64,
        #[serde(default = "default_encoding")]
        encoding: String,
    },
    SetTextPos {
        x: f64,
        y: f64,
    },
    Show {
        text: String,
    },
    ShowXy {
        text: String,
        x: f64,
        y: f64,
    },
    ContinueText {
        text: String,
    },
    ShowBoxed {
        text: String,
        left: f64,
        top: f64,
        width: f64,
        height: f64,
        #[serde(default)]
        mode: String,
        #[serde(default)]
        feature: String,
    },
    SetTextRendering {
        mode: i32,
    },
    SetgrayFill {
        gray: f64,
    },
    Translate {
        tx: f64,
        ty: f64,
    },
    Save,
    Restore,
    Rect {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
    },
    Moveto {
        x: f64,
        y: f64,
    },
    Lineto {
        x: f64,
        y: f64,
    },
    Fill,
    Stroke,
    Clip,
    /// Register an image under `name` for later `place_image` steps.
    LoadImage {
        name: String,
        kind: String,
        path: PathBuf,
    },
    PlaceImage {
        name: String,
        x: f64,
        y: f64,
        #[serde(default = "default_scale")]
        scale: f64,
    },
}

impl Step {
    /// The `op` tag of this step.
    pub fn name(&self) -> &'static str {
        match self {
            Step::BeginPage { .. } => "begin_page",
            Step::EndPage => "end_page",
            Step::Close => "close",
            Step::SetInfo { .. } => "set_info",
            Step::AddOutline { .. } => "add_outline",
            Step::SetFont { .. } => "set_font",
            Step::SetTextPos { .. } => "set_text_pos",
            Step::Show { .. } => "show",
            Step::ShowXy { .. } => "show_xy",
            Step::ContinueText { .. } => "continue_text",
            Step::ShowBoxed { .. } => "show_boxed",
            Step::SetTextRendering { .. } => "set_text_rendering",
            Step::SetgrayFill { .. } => "setgray_fill",
            Step::Translate { .. } => "translate",
            Step::Save => "save",
            Step::Restore => "restore",
            Step::Rect { .. } => "rect",
            Step::Moveto { .. } => "moveto",
            Step::Lineto { .. } => "lineto",
            Step::Fill => "fill",
            Step::Stroke => "stroke",
            Step::Clip => "clip",
            Step::LoadImage { .. } => "load_image",
            Step::PlaceImage { .. } => "place_image",
        }
    }
}

/// Executes steps against a session, remembering named images.
///
/// Relative image paths are resolved against `base_dir`.
pub struct Runner<'a> {
    session: &'a mut Session,
    base_dir: PathBuf,
    images: HashMap<String, ImageId>,
}

impl<'a> Runner<'a> {
    pub fn new(session: &'a mut Session, base_dir: impl Into<PathBuf>) -> Self {
        Self {
            session,
            base_dir: base_dir.into(),
            images: HashMap::new(),
        }
    }

    fn resolve_path(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.base_dir.join(path)
        }
    }

    /// Run one step. `show_boxed` reports how many characters did not fit.
    pub fn run(&mut self, step: &Step) -> Result<Option<usize>, PdfError> {
        let s = &mut *self.session;
        match step {
            Step::BeginPage { width, height } => s.begin_page(*width, *height)?,
            Step::EndPage => s.end_page()?,
            Step::Close => s.close()?,
            Step::SetInfo { key, value } => s.set_info(key, value)?,
            Step::AddOutline { title } => s.add_outline(title)?,
            Step::SetFont {
                name,
                size,
                encoding,
            } => s.set_font(name, *size, encoding)?,
            Step::SetTextPos { x, y } => s.set_text_pos(*x, *y)?,
            Step::Show { text } => s.show(text)?,
            Step::ShowXy { text, x, y } => s.show_xy(text, *x, *y)?,
            Step::ContinueText { text } => s.continue_text(text)?,
            Step::ShowBoxed {
                text,
                left,
                top,
                width,
                height,
                mode,
                feature,
            } => {
                let left_over = s.show_boxed(text, *left, *top, *width, *height, mode, feature)?;
                return Ok(Some(left_over));
            }
            Step::SetTextRendering { mode } => s.set_text_rendering(*mode)?,
            Step::SetgrayFill { gray } => s.setgray_fill(*gray)?,
            Step::Translate { tx, ty } => s.translate(*tx, *ty)?,
            Step::Save => s.save()?,
            Step::Restore => s.restore()?,
            Step::Rect {
                x,
                y,
                width,
                height,
            } => s.rect(*x, *y, *width, *height)?,
            Step::Moveto { x, y } => s.moveto(*x, *y)?,
            Step::Lineto { x, y } => s.lineto(*x, *y)?,
            Step::Fill => s.fill()?,
            Step::Stroke => s.stroke()?,
            Step::Clip => s.clip()?,
            Step::LoadImage { name, kind, path } => {
                let path = self.resolve_path(path);
                let id = self.session.load_image(kind, &path)?;
                self.images.insert(name.clone(), id);
            }
            Step::PlaceImage { name, x, y, scale } => {
                let id = *self
                    .images
                    .get(name)
                    .ok_or_else(|| PdfError::NotFound(format!("image {name:?}")))?;
                self.session.place_image(id, *x, *y, *scale)?;
            }
        }
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_tagged_steps() {
        let script: Script = serde_json::from_str(
            r#"{
                "steps": [
                    { "op": "begin_page", "width": 612, "height": 792 },
                    { "op": "set_font", "name": "Courier", "size": 10 },
                    { "op": "setgray_fill", "gray": 0.25 },
                    { "op": "fill" },
                    { "op": "place_image", "name": "logo", "x": 1, "y": 2 }
                ]
            }"#,
        )
        .unwrap();
        assert_eq!(script.options, SessionOptions::default());
        assert_eq!(
            script.steps,
            vec![
                Step::BeginPage {
                    width: 612.0,
                    height: 792.0
                },
                Step::SetFont {
                    name: "Courier".into(),
                    size: 10.0,
                    encoding: "host".into()
                },
                Step::SetgrayFill { gray: 0.25 },
                Step::Fill,
                Step::PlaceImage {
                    name: "logo".into(),
                    x: 1.0,
                    y: 2.0,
                    scale: 1.0
                },
            ]
        );
    }

    #[test]
    fn options_are_partial() {
        let script: Script =
            serde_json::from_str(r#"{ "options": { "line_height": 20 }, "steps": [] }"#).unwrap();
        assert_eq!(script.options.line_height, 20.0);
        assert_eq!(script.options.box_leading, SessionOptions::default().box_leading);
    }

    #[test]
    fn unknown_op_is_rejected() {
        let err = serde_json::from_str::<Script>(r#"{ "steps": [ { "op": "curveto" } ] }"#)
            .unwrap_err();
        assert!(err.to_string().contains("curveto"));
    }

    #[test]
    fn step_names_match_tags() {
        let step: Step = serde_json::from_str(r#"{ "op": "continue_text", "text": "x" }"#).unwrap();
        assert_eq!(step.name(), "continue_text");
        let step: Step = serde_json::from_str(r#"{ "op": "moveto", "x": 0, "y": 0 }"#).unwrap();
        assert_eq!(step.name(), "moveto");
    }
}
