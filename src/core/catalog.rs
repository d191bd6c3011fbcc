//! Per-room settings: teacher roster and class-type catalog.

use crate::errors::{AppError, AppResult};
use crate::models::class_type::{ClassType, DEFAULT_LEVEL};
use crate::models::room::Room;
use crate::models::teacher::Teacher;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    teachers: Vec<String>,
    classes: BTreeMap<String, String>,
}

fn clean(name: &str, what: &str) -> AppResult<String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(AppError::Validation(format!("{} name cannot be empty", what)));
    }
    Ok(trimmed.to_string())
}

impl Catalog {
    pub fn from_parts(teachers: &[Teacher], classes: &[ClassType]) -> Self {
        let mut catalog = Self::default();
        for t in teachers {
            if !t.name.is_empty() && !catalog.has_teacher(&t.name) {
                catalog.teachers.push(t.name.clone());
            }
        }
        catalog.teachers.sort();
        for c in classes {
            catalog
                .classes
                .insert(c.name.clone(), c.default_level.clone());
        }
        catalog
    }

    pub fn teachers(&self) -> &[String] {
        &self.teachers
    }

    pub fn has_teacher(&self, name: &str) -> bool {
        self.teachers.iter().any(|t| t == name)
    }

    pub fn class_types(&self, room: Room) -> Vec<ClassType> {
        self.classes
            .iter()
            .map(|(name, level)| ClassType::new(name, room, level))
            .collect()
    }

    /// Class name → default level.
    pub fn classes(&self) -> &BTreeMap<String, String> {
        &self.classes
    }

    pub fn has_class(&self, name: &str) -> bool {
        self.classes.contains_key(name)
    }

    pub fn default_level(&self, class_name: &str) -> Option<&str> {
        self.classes.get(class_name).map(String::as_str)
    }

    /// Returns the trimmed name that was inserted.
    pub fn add_teacher(&mut self, name: &str) -> AppResult<String> {
        let name = clean(name, "teacher")?;
        if self.has_teacher(&name) {
            return Err(AppError::Validation(format!(
                "teacher '{}' already exists",
                name
            )));
        }
        self.teachers.push(name.clone());
        self.teachers.sort();
        Ok(name)
    }

    pub fn rename_teacher(&mut self, old: &str, new: &str) -> AppResult<String> {
        let new = clean(new, "teacher")?;
        if !self.has_teacher(old) {
            return Err(AppError::NotFound(format!("teacher '{}'", old)));
        }
        if new != old && self.has_teacher(&new) {
            return Err(AppError::Validation(format!(
                "teacher name '{}' already exists",
                new
            )));
        }
        for t in self.teachers.iter_mut() {
            if t == old {
                *t = new.clone();
            }
        }
        self.teachers.sort();
        Ok(new)
    }

    pub fn remove_teacher(&mut self, name: &str) -> AppResult<()> {
        let before = self.teachers.len();
        self.teachers.retain(|t| t != name);
        if self.teachers.len() == before {
            return Err(AppError::NotFound(format!("teacher '{}'", name)));
        }
        Ok(())
    }

    pub fn add_class(&mut self, name: &str, default_level: &str) -> AppResult<String> {
        let name = clean(name, "class")?;
        if self.has_class(&name) {
            return Err(AppError::Validation(format!(
                "class type '{}' already exists",
                name
            )));
        }
        let level = match default_level.trim() {
            "" => DEFAULT_LEVEL,
            l => l,
        };
        self.classes.insert(name.clone(), level.to_string());
        Ok(name)
    }

    /// Rename keeping the default level.
    pub fn rename_class(&mut self, old: &str, new: &str) -> AppResult<String> {
        let new = clean(new, "class")?;
        if new != old && self.has_class(&new) {
            return Err(AppError::Validation(format!(
                "class name '{}' already exists",
                new
            )));
        }
        let level = self
            .classes
            .remove(old)
            .ok_or_else(|| AppError::NotFound(format!("class type '{}'", old)))?;
        self.classes.insert(new.clone(), level);
        Ok(new)
    }

    pub fn remove_class(&mut self, name: &str) -> AppResult<()> {
        self.classes
            .remove(name)
            .map(|_| ())
            .ok_or_else(|| AppError::NotFound(format!("class type '{}'", name)))
    }
}
