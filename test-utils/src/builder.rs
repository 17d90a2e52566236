use std::collections::BTreeMap;

use serde_json::{Map, Value};

use crate::{context::TestContext, error::TestError};

/// Builder for creating test contexts with pre-seeded store files.
///
/// Records are grouped by file name and placed under their own `guild_id` and `id`,
/// producing the same guild → unit → record layout the store writes. Call `build()`
/// to create the temporary data directory and write every seeded file.
///
/// # Example
///
/// ```rust,ignore
/// use test_utils::builder::TestBuilder;
/// use test_utils::factory::{poll::PollFactory, schedule::ScheduleFactory};
///
/// let test = TestBuilder::new()
///     .with_record("polls.json", PollFactory::new().build())
///     .with_record("schedules.json", ScheduleFactory::new().repeating(3600).build())
///     .build()
///     .await?;
/// ```
pub struct TestBuilder {
    /// Seed records per file name, in insertion order.
    records: BTreeMap<String, Vec<Value>>,

    /// Files written verbatim, used for malformed or empty store files.
    raw_files: Vec<(String, String)>,
}

impl Default for TestBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TestBuilder {
    /// Creates a new test builder with no seeded files.
    ///
    /// # Returns
    /// - New `TestBuilder` instance
    pub fn new() -> Self {
        Self {
            records: BTreeMap::new(),
            raw_files: Vec::new(),
        }
    }

    /// Adds a record to a store file.
    ///
    /// # Arguments
    /// - `file_name` - Store file the record belongs to, e.g. `"giveaways.json"`
    /// - `record` - Record in store format; must carry string `guild_id` and `id` fields
    ///
    /// # Returns
    /// - `Self` - Builder instance for method chaining
    pub fn with_record(mut self, file_name: &str, record: Value) -> Self {
        self.records
            .entry(file_name.to_string())
            .or_default()
            .push(record);
        self
    }

    /// Writes a file with exactly the given contents.
    ///
    /// # Arguments
    /// - `file_name` - File name inside the data directory
    /// - `contents` - Raw file contents
    ///
    /// # Returns
    /// - `Self` - Builder instance for method chaining
    pub fn with_raw_file(mut self, file_name: &str, contents: &str) -> Self {
        self.raw_files
            .push((file_name.to_string(), contents.to_string()));
        self
    }

    /// Builds the test context and writes every seeded file.
    ///
    /// # Returns
    /// - `Ok(TestContext)` - Context owning the populated temporary data directory
    /// - `Err(TestError::Io)` - Failed to create the directory or write a file
    /// - `Err(TestError::MalformedRecord)` - A seed record has no string `guild_id` or `id`
    pub async fn build(self) -> Result<TestContext, TestError> {
        let context = TestContext::new()?;

        for (file_name, records) in self.records {
            let mut guilds: Map<String, Value> = Map::new();

            for record in records {
                let guild_id = string_field(&record, "guild_id")?;
                let id = string_field(&record, "id")?;

                let guild = guilds
                    .entry(guild_id)
                    .or_insert_with(|| Value::Object(Map::new()));
                if let Value::Object(units) = guild {
                    units.insert(id, record);
                }
            }

            context.write_json(&file_name, &Value::Object(guilds))?;
        }

        for (file_name, contents) in self.raw_files {
            context.write_raw(&file_name, &contents)?;
        }

        Ok(context)
    }
}

fn string_field(record: &Value, field: &'static str) -> Result<String, TestError> {
    record
        .get(field)
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or(TestError::MalformedRecord(field))
}
