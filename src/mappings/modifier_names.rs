use crate::events::ModifierFlags;
use once_cell::sync::Lazy;
use std::collections::HashMap;

/// Преобразование имён модификаторов из конфигурации в флаги
pub struct ModifierNames;

// Статическая карта имён, включая привычные псевдонимы
static NAME_TO_FLAG: Lazy<HashMap<&'static str, ModifierFlags>> = Lazy::new(|| {
    let mut map = HashMap::new();

    map.insert("shift", ModifierFlags::SHIFT);

    map.insert("ctrl", ModifierFlags::CONTROL);
    map.insert("control", ModifierFlags::CONTROL);

    map.insert("alt", ModifierFlags::ALT);
    map.insert("option", ModifierFlags::ALT);

    map.insert("super", ModifierFlags::SUPER);
    map.insert("meta", ModifierFlags::SUPER);
    map.insert("cmd", ModifierFlags::SUPER);
    map.insert("command", ModifierFlags::SUPER);

    map
});

impl ModifierNames {
    /// Получить флаг модификатора по имени (регистронезависимо)
    pub fn translate(name: &str) -> Option<ModifierFlags> {
        NAME_TO_FLAG.get(name.trim().to_lowercase().as_str()).copied()
    }

    /// Собрать набор из списка имён. Возвращает первое неизвестное имя при ошибке.
    pub fn parse_set<S: AsRef<str>>(names: &[S]) -> Result<ModifierFlags, String> {
        names.iter().try_fold(ModifierFlags::empty(), |set, name| {
            Self::translate(name.as_ref())
                .map(|flag| set | flag)
                .ok_or_else(|| name.as_ref().to_string())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aliases() {
        assert_eq!(ModifierNames::translate("Control"), Some(ModifierFlags::CONTROL));
        assert_eq!(ModifierNames::translate("option"), Some(ModifierFlags::ALT));
        assert_eq!(ModifierNames::translate("cmd"), Some(ModifierFlags::SUPER));
        assert_eq!(ModifierNames::translate("hyper"), None);
    }

    #[test]
    fn test_parse_set() {
        let set = ModifierNames::parse_set(&["ctrl", "alt"]).unwrap();
        assert_eq!(set, ModifierFlags::CONTROL | ModifierFlags::ALT);

        let empty: [&str; 0] = [];
        assert_eq!(ModifierNames::parse_set(&empty).unwrap(), ModifierFlags::empty());

        assert_eq!(ModifierNames::parse_set(&["ctrl", "fn"]), Err("fn".to_string()));
    }
}
