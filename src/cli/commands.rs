use std::{fs, path::Path};

use uuid::Uuid;

use crate::{
    cli::{output, prompts::prompt_decision},
    config::{Config, ConfigManager, SettingsSource},
    core::{
        clock::SystemClock,
        editor::{EditorContext, RecipeEditor},
        errors::{EditorError, Result, StorageError},
        services::{
            init_draft, nutrition_rows, recompute_nutrition, FlatteningNormalizer, NutrientTotals,
        },
        utils::PathResolver,
    },
    domain::{IncomingItem, NamedEntity, PersistedRecipe, RECIPES_COLLECTION},
    storage::{JsonRecipeStore, RecipeStore},
};

pub const USAGE: &str = "\
Usage: recipe_editor_cli <command> [args]

Commands:
  new <name> [items.json]     Create a recipe, optionally with picker items
  add <id> <items.json>       Add picker items to a recipe
  remove <id> <position>      Remove the item at a 1-based position
  move <id> <from> <to>       Move an item between 1-based positions
  set <id> <field> <value>    Set name, notes, unit or portion (empty clears)
  category <id> <label>       Toggle a category on a recipe
  unarchive <id>              Clear the archived flag
  show <id>                   Show a recipe with its nutrition
  list                        List saved recipes
  help                        Show this message";

/// Store and settings shared by every command.
pub struct CliContext {
    store: JsonRecipeStore,
    config: Config,
}

impl CliContext {
    /// Loads settings and opens the store under the application directory.
    pub fn load() -> Result<Self> {
        let base = PathResolver::base_dir();
        let config = ConfigManager::with_base_dir(&base)?.load()?;
        let store = JsonRecipeStore::new(PathResolver::store_dir_in(&base))?;
        Ok(Self::new(store, config))
    }

    pub fn new(store: JsonRecipeStore, config: Config) -> Self {
        Self { store, config }
    }

    pub fn dispatch(&self, command: &str, args: &[&str]) -> Result<()> {
        match (command, args) {
            ("new", [name]) => self.create(name, None),
            ("new", [name, items]) => self.create(name, Some(*items)),
            ("add", [id, items]) => self.add(id, items),
            ("remove", [id, position]) => self.remove(id, position),
            ("move", [id, from, to]) => self.move_item(id, from, to),
            ("set", [id, field, value]) => self.set_field(id, field, value),
            ("category", [id, label]) => self.toggle_category(id, label),
            ("unarchive", [id]) => self.unarchive(id),
            ("show", [id]) => self.show(id),
            ("list", []) => self.list(),
            ("help", _) => {
                println!("{USAGE}");
                Ok(())
            }
            _ => Err(EditorError::InvalidInput(format!(
                "unknown command or arguments: {}",
                std::iter::once(command)
                    .chain(args.iter().copied())
                    .collect::<Vec<_>>()
                    .join(" ")
            ))),
        }
    }

    fn create(&self, name: &str, items_path: Option<&str>) -> Result<()> {
        let items = match items_path {
            Some(path) => read_items(Path::new(path))?,
            None => Vec::new(),
        };
        let mut editor = RecipeEditor::open(
            EditorContext::new_recipe().with_items(items),
            &self.config,
            &FlatteningNormalizer,
            &NutrientTotals,
            prompt_decision,
        )?;
        editor.metadata_mut().name = Some(name.to_string());
        let record = editor.save(&self.store, &NutrientTotals, &SystemClock)?;
        self.report_saved(&record);
        Ok(())
    }

    fn add(&self, id: &str, items_path: &str) -> Result<()> {
        let items = read_items(Path::new(items_path))?;
        let mut editor = self.open_existing(id)?;
        let summary = editor.add_items(items, &FlatteningNormalizer, &NutrientTotals, prompt_decision)?;
        output::info(format!(
            "Added {} item(s), {} confirmed, {} skipped.",
            summary.appended,
            summary.prompted - summary.skipped,
            summary.skipped
        ));
        let record = editor.save(&self.store, &NutrientTotals, &SystemClock)?;
        self.report_saved(&record);
        Ok(())
    }

    fn remove(&self, id: &str, position: &str) -> Result<()> {
        let index = parse_position(position)?;
        let mut editor = self.open_existing(id)?;
        let removed = editor.remove_item(index, &NutrientTotals)?;
        output::info(format!(
            "Removed {}.",
            removed.name().unwrap_or("item")
        ));
        let record = editor.save(&self.store, &NutrientTotals, &SystemClock)?;
        self.report_saved(&record);
        Ok(())
    }

    fn move_item(&self, id: &str, from: &str, to: &str) -> Result<()> {
        let from = parse_position(from)?;
        let to = parse_position(to)?;
        let mut editor = self.open_existing(id)?;
        editor.move_item(from, to)?;
        let record = editor.save(&self.store, &NutrientTotals, &SystemClock)?;
        self.report_saved(&record);
        Ok(())
    }

    fn set_field(&self, id: &str, field: &str, value: &str) -> Result<()> {
        let mut editor = self.open_existing(id)?;
        let text = Some(value.trim().to_string()).filter(|text| !text.is_empty());
        let metadata = editor.metadata_mut();
        match field.to_lowercase().as_str() {
            "name" => metadata.name = text,
            "notes" => metadata.notes = text,
            "unit" => metadata.unit = text,
            "portion" => metadata.portion = text.as_deref().map(parse_amount).transpose()?,
            other => {
                return Err(EditorError::InvalidInput(format!(
                    "unknown field `{other}`, expected name, notes, unit or portion"
                )))
            }
        }
        let record = editor.save(&self.store, &NutrientTotals, &SystemClock)?;
        self.report_saved(&record);
        Ok(())
    }

    fn toggle_category(&self, id: &str, label: &str) -> Result<()> {
        let label = label.trim();
        if label.is_empty() {
            return Err(EditorError::InvalidInput("category label is empty".into()));
        }
        let mut editor = self.open_existing(id)?;
        let categories = editor.categories_mut();
        if categories.remove(label) {
            output::info(format!("Removed category {label}."));
        } else {
            categories.insert(label.to_string());
            output::info(format!("Added category {label}."));
        }
        let record = editor.save(&self.store, &NutrientTotals, &SystemClock)?;
        self.report_saved(&record);
        Ok(())
    }

    fn unarchive(&self, id: &str) -> Result<()> {
        let mut editor = self.open_existing(id)?;
        editor.clear_archived();
        let record = editor.save(&self.store, &NutrientTotals, &SystemClock)?;
        self.report_saved(&record);
        Ok(())
    }

    fn show(&self, id: &str) -> Result<()> {
        let record = self.fetch(id)?;
        output::section(record.name().unwrap_or("Untitled recipe"));
        if let Some(notes) = &record.metadata.notes {
            output::info(notes);
        }
        if let Some(portion) = record.metadata.portion {
            output::info(format!(
                "Portion: {portion} {}",
                record.metadata.unit.as_deref().unwrap_or_default()
            ));
        }
        if !record.categories.is_empty() {
            let labels: Vec<&str> = record.categories.iter().map(String::as_str).collect();
            output::info(format!("Categories: {}", labels.join(", ")));
        }
        for (position, item) in record.items.iter().enumerate() {
            println!(
                "  {}. {} {} x{}",
                position + 1,
                item.name().unwrap_or("(meal)"),
                item.portion
                    .map(|portion| format!("{portion} {}", item.unit.as_deref().unwrap_or_default()))
                    .unwrap_or_default(),
                item.servings()
            );
        }
        let nutrition = match &record.nutrition {
            Some(nutrition) => nutrition.clone(),
            None => recompute_nutrition(&init_draft(Some(&record)), &NutrientTotals)?,
        };
        output::section("Nutrition");
        output::nutrition_table(&nutrition_rows(&nutrition, &self.config.nutriments()));
        Ok(())
    }

    fn list(&self) -> Result<()> {
        let records = self.store.list(RECIPES_COLLECTION)?;
        if records.is_empty() {
            output::info("No recipes saved yet.");
            return Ok(());
        }
        for record in records {
            println!(
                "{}  {}  ({} items){}",
                record.id.map(|id| id.to_string()).unwrap_or_default(),
                record.name().unwrap_or("Untitled"),
                record.items.len(),
                if record.archived { " [archived]" } else { "" }
            );
        }
        Ok(())
    }

    fn fetch(&self, id: &str) -> Result<PersistedRecipe> {
        let id = Uuid::parse_str(id)
            .map_err(|_| EditorError::InvalidInput(format!("`{id}` is not a recipe id")))?;
        self.store
            .get(RECIPES_COLLECTION, id)?
            .ok_or_else(|| StorageError::NotFound(id.to_string()).into())
    }

    fn open_existing(&self, id: &str) -> Result<RecipeEditor> {
        let record = self.fetch(id)?;
        RecipeEditor::open(
            EditorContext::editing(record),
            &self.config,
            &FlatteningNormalizer,
            &NutrientTotals,
            prompt_decision,
        )
    }

    fn report_saved(&self, record: &PersistedRecipe) {
        output::success(format!(
            "Saved recipe {} ({} items)",
            record.id.map(|id| id.to_string()).unwrap_or_default(),
            record.items.len()
        ));
    }
}

/// Reads a JSON array of picker items.
pub fn read_items(path: &Path) -> Result<Vec<IncomingItem>> {
    let data = fs::read_to_string(path).map_err(|err| {
        EditorError::InvalidInput(format!("cannot read {}: {err}", path.display()))
    })?;
    serde_json::from_str(&data).map_err(|err| {
        EditorError::InvalidInput(format!("invalid items in {}: {err}", path.display()))
    })
}

fn parse_amount(raw: &str) -> Result<f64> {
    match raw.parse::<f64>() {
        Ok(value) if value.is_finite() && value >= 0.0 => Ok(value),
        _ => Err(EditorError::InvalidInput(format!(
            "`{raw}` is not a valid amount"
        ))),
    }
}

/// Converts a 1-based position into an index.
fn parse_position(raw: &str) -> Result<usize> {
    match raw.trim().parse::<usize>() {
        Ok(position) if position > 0 => Ok(position - 1),
        _ => Err(EditorError::InvalidInput(format!(
            "`{raw}` is not a valid position"
        ))),
    }
}
