use anyhow::Result;
use crux_core::typegen::TypeGen;
use std::path::PathBuf;
use touch_settings_core::{
    events::{AdvancedEvent, KeyboardEvent, PromptEvent, UiEvent, WifiEvent},
    types::{
        ConnectedType, KeyCommand, KeyboardMode, Page, PromptPurpose, SecurityType, StatusIcon,
    },
    App,
};

fn main() -> Result<()> {
    println!("cargo:rerun-if-changed=../app");

    let mut gen = TypeGen::new();

    gen.register_app::<App>()?;

    // Explicitly register domain event enums to ensure all variants are traced
    gen.register_type::<WifiEvent>()?;
    gen.register_type::<KeyboardEvent>()?;
    gen.register_type::<PromptEvent>()?;
    gen.register_type::<AdvancedEvent>()?;
    gen.register_type::<UiEvent>()?;

    // Explicitly register other enums to ensure all variants are traced
    gen.register_type::<SecurityType>()?;
    gen.register_type::<ConnectedType>()?;
    gen.register_type::<StatusIcon>()?;
    gen.register_type::<Page>()?;
    gen.register_type::<KeyboardMode>()?;
    gen.register_type::<KeyCommand>()?;
    gen.register_type::<PromptPurpose>()?;

    let output_root = PathBuf::from("./generated");

    gen.typescript("shared_types", output_root.join("typescript"))?;

    Ok(())
}
