use dialoguer::{theme::ColorfulTheme, Input, Select};

use crate::cli::{output, test_mode};
use crate::core::services::{PromptDecision, PromptRequest};

const ADD: usize = 0;

/// Asks whether to add an item and with which portion and quantity.
///
/// Scripted answers take precedence. If the terminal cannot be read the
/// item is added unchanged.
pub fn prompt_decision(request: &PromptRequest) -> PromptDecision {
    if let Some(scripted) = test_mode::next_decision() {
        return scripted;
    }
    match ask(request) {
        Ok(decision) => decision,
        Err(err) => {
            output::warning(format!("Prompt unavailable ({err}); adding item as is."));
            PromptDecision::Skip
        }
    }
}

fn ask(request: &PromptRequest) -> Result<PromptDecision, dialoguer::Error> {
    let theme = ColorfulTheme::default();
    if let Some(notes) = &request.notes {
        output::info(notes);
    }

    let choice = Select::with_theme(&theme)
        .with_prompt(&request.title)
        .items(&["Add", "Skip"])
        .default(ADD)
        .interact()?;
    if choice != ADD {
        return Ok(PromptDecision::Skip);
    }

    let portion_default = request
        .default_portion
        .map(|portion| portion.to_string())
        .unwrap_or_default();
    let portion = Input::<String>::with_theme(&theme)
        .with_prompt(format!("Portion ({})", request.unit))
        .default(portion_default)
        .allow_empty(true)
        .interact_text()?;
    let quantity = Input::<String>::with_theme(&theme)
        .with_prompt("Quantity")
        .default(request.default_quantity.to_string())
        .allow_empty(true)
        .interact_text()?;

    Ok(PromptDecision::Accept {
        portion: Some(portion),
        quantity: Some(quantity),
    })
}
