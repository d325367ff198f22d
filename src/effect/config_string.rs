//! Option values as a single persisted string
//!
//! `name=v[,v...]` entries joined by `;`. Entries are keyed by name, so a
//! string saved by an older version of a shader still applies after options
//! are added, removed or reordered.

use super::Effect;
use crate::utils::text::{format_components, parse_components};
use crate::utils::{CONFIG_ENTRY_SEPARATOR, CONFIG_VALUE_SEPARATOR};

impl Effect {
    /// Encode the current value of every valid option, in declaration order
    pub fn config_string(&self) -> String {
        self.options()
            .iter()
            .filter(|o| o.is_valid())
            .map(|o| format!("{}{}{}", o.name, CONFIG_VALUE_SEPARATOR, format_components(&o.current())))
            .collect::<Vec<_>>()
            .join(CONFIG_ENTRY_SEPARATOR.to_string().as_str())
    }

    /// Reset all options to their defaults, then apply entries in order.
    /// Unknown names are skipped; a malformed entry puts its option back to
    /// the default, even if an earlier entry had set it.
    pub fn set_config_string(&mut self, config: &str) {
        self.reset_options();

        for entry in config.split(CONFIG_ENTRY_SEPARATOR) {
            let entry = entry.trim();
            if entry.is_empty() {
                continue;
            }

            let Some((name, value)) = entry.split_once(CONFIG_VALUE_SEPARATOR) else {
                log::warn!("[Effect] Config entry '{}' has no value; using default", entry);
                if let Some(option) = self.option_by_name_mut(entry) {
                    option.reset_to_default();
                }
                continue;
            };
            let name = name.trim();

            let Some(option) = self.option_by_name_mut(name) else {
                log::debug!("[Effect] Config entry '{}' matches no option, skipping", name);
                continue;
            };
            if !option.is_valid() {
                continue;
            }

            let components = match parse_components(option.ty, value) {
                Ok(components) if components.len() == option.components() => components,
                Ok(components) => {
                    log::warn!(
                        "[Effect] Config entry '{}' has {} component(s), expected {}; using default",
                        name,
                        components.len(),
                        option.components()
                    );
                    option.reset_to_default();
                    continue;
                }
                Err(err) => {
                    log::warn!("[Effect] Config entry '{}' is malformed ({}); using default", name, err);
                    option.reset_to_default();
                    continue;
                }
            };

            for (index, component) in components.into_iter().enumerate() {
                option.set_component(index, component);
            }
        }
    }
}
