use serde::{Deserialize, Serialize};

use super::table::ReplacementTable;

/// Replacement tables shipped with the tool.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display, strum::EnumIter,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum BuiltinTable {
    /// Typographic punctuation, e.g. `вЂ”` -> `—`.
    Punctuation,
    /// Whole phrases of the site's Russian interface.
    UiPhrases,
    /// Single Cyrillic letters.  Catches what the other tables miss, at the risk of
    /// touching text that only looks garbled.
    CyrillicPairs,
}

impl BuiltinTable {
    pub fn table(self) -> ReplacementTable {
        let entries = match self {
            Self::Punctuation => PUNCTUATION,
            Self::UiPhrases => UI_PHRASES,
            Self::CyrillicPairs => CYRILLIC_PAIRS,
        };
        entries.iter().copied().collect()
    }
}

// `вЂ` is the common prefix of every other entry, so it goes last.
const PUNCTUATION: &[(&str, &str)] = &[
    ("вЂ”", "—"),
    ("вЂ“", "–"),
    ("вЂ™", "’"),
    ("вЂњ", "“"),
    ("вЂќ", "”"),
    ("вЂ¦", "…"),
    ("вЂ‘", "-"),
    ("вЂў", "•"),
    ("вЂ\u{98}", "‘"),
    ("вЂ", "'"),
];

// Longer phrases first; `Промокод` is part of several others.
const UI_PHRASES: &[(&str, &str)] = &[
    ("РќРµС‚ Р·Р°РіСЂСѓР¶РµРЅРЅС‹С… С„РёР»СЊРјРѕРІ", "Нет загруженных фильмов"),
    ("Р¤РёР»СЊРј РґРѕР±Р°РІР»РµРЅ РІ Р·Р°РіСЂСѓР·РєРё", "Фильм добавлен в загрузки"),
    ("РќР°С‡Р°Р»Р°СЃСЊ Р·Р°РіСЂСѓР·РєР°. Р¤РёР»СЊРј РїРѕСЏРІРёС‚СЃСЏ РІ СЂР°Р·РґРµР»Рµ Р·Р°РіСЂСѓР·РѕРє", "Началась загрузка. Фильм появится в разделе загрузок"),
    ("Р’С‹ РѕСЃС‚Р°РЅРѕРІРёР»РёСЃСЊ СЂР°РЅРµРµ. РџСЂРѕРґРѕР»Р¶РёС‚СЊ РїСЂРѕСЃРјРѕС‚СЂ СЃ СЌС‚РѕРіРѕ РјРµСЃС‚Р°?", "Вы остановились ранее. Продолжить просмотр с этого места?"),
    ("РџРѕРєР°Р·С‹РІР°С‚СЊ Р·Р°РїСЂРѕСЃ РїСЂРѕРґРѕР»Р¶РµРЅРёСЏ", "Показывать запрос продолжения"),
    ("РџСЂРё РІРѕР·РІСЂР°С‚Рµ Рє С„РёР»СЊРјСѓ СЃРїСЂР°С€РёРІР°С‚СЊ, С…РѕС‚РёС‚Рµ Р»Рё РїСЂРѕРґРѕР»Р¶РёС‚СЊ СЃ СЃРѕС…СЂР°РЅС‘РЅРЅРѕРіРѕ РјРµСЃС‚Р°", "При возврате к фильму спрашивать, хотите ли продолжить с сохранённого места"),
    ("РџРѕР¶Р°Р»СѓР№СЃС‚Р°, РґРѕР¶РґРёС‚РµСЃСЊ РїРѕРґРєР»СЋС‡РµРЅРёСЏ РѕРїРµСЂР°С‚РѕСЂР°", "Пожалуйста, дождитесь подключения оператора"),
    ("Р’Р°С€Р° РїРѕР·РёС†РёСЏ РІ РѕС‡РµСЂРµРґРё", "Ваша позиция в очереди"),
    ("Р”РµР№СЃС‚РІРёС‚РµР»СЊРЅРѕ РґРѕ", "Действительно до"),
    ("РґРЅРµР№ РѕСЃС‚Р°Р»РѕСЃСЊ", "дней осталось"),
    ("Р”РѕР±Р°РІРёС‚СЊ РїСЂРѕС„РёР»СЊ", "Добавить профиль"),
    ("Р”РѕР±Р°РІРёС‚СЊ РґРµС‚СЃРєРёР№", "Добавить детский"),
    ("РЎРјРµРЅРёС‚СЊ Р°РєРєР°СѓРЅС‚", "Сменить аккаунт"),
    ("Р’РІРµРґРёС‚Рµ РїСЂРѕРјРѕРєРѕРґ", "Введите промокод"),
    ("Р’Р°С€Рё РїСЂРѕРјРѕРєРѕРґС‹", "Ваши промокоды"),
    ("РџСЂРѕРјРѕРєРѕРґРѕРІ РЅРµС‚", "Промокодов нет"),
    ("РџСЂРѕРјРѕРєРѕРґ СЃРєРѕРїРёСЂРѕРІР°РЅ", "Промокод скопирован"),
    ("РџСЂРѕРјРѕРєРѕРґ", "Промокод"),
    ("РђРєС‚РёРІРёСЂРѕРІР°С‚СЊ", "Активировать"),
    ("РђРєС‚РёРІРёСЂРѕРІР°РЅ", "Активирован"),
    ("РќРµ РёСЃРїРѕР»СЊР·РѕРІР°РЅ", "Не использован"),
    ("РљРѕРїРёСЂРѕРІР°С‚СЊ", "Копировать"),
    ("РЎРѕР·РґР°С‚СЊ РєРѕРґ", "Создать код"),
    ("Р§Р°С‚ РїРѕРґРґРµСЂР¶РєРё", "Чат поддержки"),
    ("Р’РІРµРґРёС‚Рµ СЃРѕРѕР±С‰РµРЅРёРµ", "Введите сообщение"),
    ("РћС‚РїСЂР°РІРёС‚СЊ", "Отправить"),
    ("Р—Р°РіСЂСѓР¶РµРЅРѕ", "Загружено"),
    ("Р—Р°РіСЂСѓР·РєРё", "Загрузки"),
    ("РЎРєР°С‡Р°С‚СЊ", "Скачать"),
    ("Р’С‹ РѕС„Р»Р°Р№РЅ", "Вы офлайн"),
    ("Р’С‹ РѕРЅР»Р°Р№РЅ", "Вы онлайн"),
    ("РѕС†РµРЅРѕРє", "оценок"),
];

// `И` ends in byte 0x98, which windows-1251 leaves undefined and decoders pass through as U+0098.
const CYRILLIC_PAIRS: &[(&str, &str)] = &[
    ("Рђ", "А"),
    ("Р‘", "Б"),
    ("Р’", "В"),
    ("Р“", "Г"),
    ("Р”", "Д"),
    ("Р•", "Е"),
    ("Р–", "Ж"),
    ("Р—", "З"),
    ("Р\u{98}", "И"),
    ("Р™", "Й"),
    ("Рљ", "К"),
    ("Р›", "Л"),
    ("Рњ", "М"),
    ("Рќ", "Н"),
    ("Рћ", "О"),
    ("Рџ", "П"),
    ("Р\u{a0}", "Р"),
    ("РЎ", "С"),
    ("Рў", "Т"),
    ("РЈ", "У"),
    ("Р¤", "Ф"),
    ("РҐ", "Х"),
    ("Р¦", "Ц"),
    ("Р§", "Ч"),
    ("РЁ", "Ш"),
    ("Р©", "Щ"),
    ("РЄ", "Ъ"),
    ("Р«", "Ы"),
    ("Р¬", "Ь"),
    ("Р\u{ad}", "Э"),
    ("Р®", "Ю"),
    ("РЇ", "Я"),
    ("Р°", "а"),
    ("Р±", "б"),
    ("РІ", "в"),
    ("Рі", "г"),
    ("Рґ", "д"),
    ("Рµ", "е"),
    ("Р¶", "ж"),
    ("Р·", "з"),
    ("Рё", "и"),
    ("Р№", "й"),
    ("Рє", "к"),
    ("Р»", "л"),
    ("Рј", "м"),
    ("РЅ", "н"),
    ("Рѕ", "о"),
    ("Рї", "п"),
    ("СЂ", "р"),
    ("СЃ", "с"),
    ("С‚", "т"),
    ("Сѓ", "у"),
    ("С„", "ф"),
    ("С…", "х"),
    ("С†", "ц"),
    ("С‡", "ч"),
    ("С€", "ш"),
    ("С‰", "щ"),
    ("СЉ", "ъ"),
    ("С‹", "ы"),
    ("СЊ", "ь"),
    ("СЌ", "э"),
    ("СЋ", "ю"),
    ("СЏ", "я"),
    ("РЃ", "Ё"),
    ("С‘", "ё"),
];
