pub mod ast;
pub mod builders;
pub mod condition;
pub mod control;
pub mod error;
pub mod factory;
pub mod fold;
pub mod ir;
pub mod registry;
pub mod resolve;
pub mod suggest;
pub mod transform;

use anyhow::Result;
use ast::{Declaration, EventType, Sprite};
use error::TransformResult;
use ir::Root;

pub use error::{ErrorKind, TransformError};
pub use factory::BlockFactory;
pub use registry::DefinitionRegistry;
pub use transform::{TransformOptions, Transformer};

type TransformProgressCallback<'a> = dyn FnMut(usize, usize, &str) + 'a;

/// Transforms every declaration of a sprite, failing on the first error.
pub fn transform_sprite(
    sprite: &Sprite,
    factory: &BlockFactory,
    options: TransformOptions,
) -> TransformResult<Vec<Root>> {
    transform_sprite_with_progress(
        sprite,
        factory,
        options,
        Option::<&mut fn(usize, usize, &str)>::None,
    )
}

pub fn transform_sprite_with_progress<F>(
    sprite: &Sprite,
    factory: &BlockFactory,
    options: TransformOptions,
    progress: Option<&mut F>,
) -> TransformResult<Vec<Root>>
where
    F: FnMut(usize, usize, &str),
{
    let mut progress = progress.map(|cb| cb as &mut TransformProgressCallback<'_>);
    let registry = registry::collect(sprite)?;
    let transformer = Transformer::new(&registry, factory, options);
    let total = sprite.declarations.len();
    if total == 0 {
        report_progress(&mut progress, 1, 1, "No declarations");
    }
    let mut roots = Vec::with_capacity(total);
    for (index, declaration) in sprite.declarations.iter().enumerate() {
        roots.push(transformer.transform_declaration(declaration)?);
        report_progress(
            &mut progress,
            index + 1,
            total,
            &declaration_label(declaration),
        );
    }
    Ok(roots)
}

/// Like [`transform_sprite`] with default options, reporting errors as text.
pub fn compile_sprite(sprite: &Sprite, factory: &BlockFactory) -> Result<Vec<Root>> {
    transform_sprite(sprite, factory, TransformOptions::default())
        .map_err(|e| anyhow::anyhow!(format_transform_error(&sprite.name, &e)))
}

fn format_transform_error(sprite: &str, err: &TransformError) -> String {
    let mut out = format!("Transform error in sprite '{}': {}", sprite, err);
    if let Some(help) = err.help() {
        out.push_str("\n  help: ");
        out.push_str(help);
    }
    out
}

fn report_progress(
    progress: &mut Option<&mut TransformProgressCallback<'_>>,
    step: usize,
    total: usize,
    label: &str,
) {
    if let Some(cb) = progress.as_deref_mut() {
        cb(step, total, label);
    }
}

fn declaration_label(declaration: &Declaration) -> String {
    match declaration {
        Declaration::Procedure(procedure) => format!("Transformed function `{}`", procedure.name.value),
        Declaration::Event(script) => {
            let event = match &script.event_type {
                EventType::WhenIReceive(_) => "when I receive",
                EventType::WhenKeyPressed(_) => "when key pressed",
                EventType::WhenBackdropSwitchesTo(_) => "when backdrop switches",
                EventType::WhenLoudnessExceeds(_) => "when loudness exceeds",
                EventType::WhenTimerExceeds(_) => "when timer exceeds",
                EventType::WhenFlagClicked => "when flag clicked",
                EventType::WhenThisSpriteClicked => "when this sprite clicked",
                EventType::WhenICloneStart => "when I start as a clone",
            };
            format!("Transformed script `{}` (line {})", event, script.pos.line)
        }
    }
}
