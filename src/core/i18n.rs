//! 界面文案
//!
//! 查找顺序：请求的语言 → 英语 → 键名本身，保证永远有字符串可显示。

/// 支持的界面语言
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Locale {
    En,
    Pt,
    Es,
    Fr,
    De,
    Ru,
    Nl,
    Uk,
    No,
}

impl Locale {
    pub const ALL: [Locale; 9] = [
        Locale::En,
        Locale::Pt,
        Locale::Es,
        Locale::Fr,
        Locale::De,
        Locale::Ru,
        Locale::Nl,
        Locale::Uk,
        Locale::No,
    ];

    /// 接受 `pt`、`pt-BR`、`PT_br` 之类的写法
    pub fn from_code(code: &str) -> Option<Self> {
        let primary = code
            .split(['-', '_'])
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();
        Self::ALL.into_iter().find(|l| l.code() == primary)
    }

    pub fn code(self) -> &'static str {
        match self {
            Locale::En => "en",
            Locale::Pt => "pt",
            Locale::Es => "es",
            Locale::Fr => "fr",
            Locale::De => "de",
            Locale::Ru => "ru",
            Locale::Nl => "nl",
            Locale::Uk => "uk",
            Locale::No => "no",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Locale::En => "English",
            Locale::Pt => "Português",
            Locale::Es => "Español",
            Locale::Fr => "Français",
            Locale::De => "Deutsch",
            Locale::Ru => "Русский",
            Locale::Nl => "Nederlands",
            Locale::Uk => "Українська",
            Locale::No => "Norsk",
        }
    }

    fn table(self) -> fn(TextKey) -> Option<&'static str> {
        match self {
            Locale::En => en,
            Locale::Pt => pt,
            Locale::Es => es,
            Locale::Fr => fr,
            Locale::De => de,
            Locale::Ru => ru,
            Locale::Nl => nl,
            Locale::Uk => uk,
            Locale::No => no,
        }
    }
}

/// 库需要向宿主提供的文案
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextKey {
    LevelUp,
    Level,
    TotalXp,
    XpToNext,
    Rank,
    Reports,
    Scanning,
    Shielding,
    IdiotLogged,
    NoVehicle,
    SystemNoVehicle,
    TryAgain,
    PostAnon,
    AnonWarningTitle,
    AnonWarningDesc,
    TopVigilantes,
    PrizeVault,
    Claim,
    Locked,
    You,
    NearbyPlaces,
    SearchResults,
    Tagging,
    CameraPermissionDenied,
    CameraInsecureContext,
    CameraUnavailable,
}

impl TextKey {
    /// 键名，查不到任何翻译时直接显示它
    pub fn name(self) -> &'static str {
        match self {
            TextKey::LevelUp => "levelUp",
            TextKey::Level => "level",
            TextKey::TotalXp => "totalXP",
            TextKey::XpToNext => "xpToNext",
            TextKey::Rank => "rank",
            TextKey::Reports => "reports",
            TextKey::Scanning => "scanning",
            TextKey::Shielding => "shielding",
            TextKey::IdiotLogged => "idiotLogged",
            TextKey::NoVehicle => "noVehicle",
            TextKey::SystemNoVehicle => "systemNoVehicle",
            TextKey::TryAgain => "tryAgain",
            TextKey::PostAnon => "postAnon",
            TextKey::AnonWarningTitle => "anonWarningTitle",
            TextKey::AnonWarningDesc => "anonWarningDesc",
            TextKey::TopVigilantes => "topVigilantes",
            TextKey::PrizeVault => "prizeVault",
            TextKey::Claim => "claim",
            TextKey::Locked => "locked",
            TextKey::You => "you",
            TextKey::NearbyPlaces => "nearbyPlaces",
            TextKey::SearchResults => "searchResults",
            TextKey::Tagging => "tagging",
            TextKey::CameraPermissionDenied => "cameraPermissionDenied",
            TextKey::CameraInsecureContext => "cameraInsecureContext",
            TextKey::CameraUnavailable => "cameraUnavailable",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        ALL_KEYS.into_iter().find(|k| k.name() == name)
    }
}

pub const ALL_KEYS: [TextKey; 26] = [
    TextKey::LevelUp,
    TextKey::Level,
    TextKey::TotalXp,
    TextKey::XpToNext,
    TextKey::Rank,
    TextKey::Reports,
    TextKey::Scanning,
    TextKey::Shielding,
    TextKey::IdiotLogged,
    TextKey::NoVehicle,
    TextKey::SystemNoVehicle,
    TextKey::TryAgain,
    TextKey::PostAnon,
    TextKey::AnonWarningTitle,
    TextKey::AnonWarningDesc,
    TextKey::TopVigilantes,
    TextKey::PrizeVault,
    TextKey::Claim,
    TextKey::Locked,
    TextKey::You,
    TextKey::NearbyPlaces,
    TextKey::SearchResults,
    TextKey::Tagging,
    TextKey::CameraPermissionDenied,
    TextKey::CameraInsecureContext,
    TextKey::CameraUnavailable,
];

pub fn lookup(locale: Locale, key: TextKey) -> &'static str {
    (locale.table())(key)
        .or_else(|| en(key))
        .unwrap_or_else(|| key.name())
}

/// 按语言代码查找，未知代码按英语处理
pub fn text(language: &str, key: TextKey) -> &'static str {
    lookup(Locale::from_code(language).unwrap_or(Locale::En), key)
}

fn en(key: TextKey) -> Option<&'static str> {
    use TextKey::*;
    Some(match key {
        LevelUp => "LEVEL UP!",
        Level => "Level",
        TotalXp => "Total XP",
        XpToNext => "XP to next level",
        Rank => "Rank",
        Reports => "Reports",
        Scanning => "Scanning for idiots...",
        Shielding => "HARDENING ENCRYPTION...",
        IdiotLogged => "DRAFTING POST",
        NoVehicle => "WARNING: TARGET NOT A VEHICLE",
        SystemNoVehicle => "System failed to identify a motor vehicle in this image.",
        TryAgain => "Return to Camera",
        PostAnon => "Post Anonymously",
        AnonWarningTitle => "ANONYMOUS WARNING",
        AnonWarningDesc => "Anonymous posts are untraceable and do not award XP. Continue?",
        TopVigilantes => "TOP VIGILANTES",
        PrizeVault => "PRIZE VAULT",
        Claim => "Claim Reward",
        Locked => "Locked",
        You => "YOU",
        NearbyPlaces => "NEARBY VENUES",
        SearchResults => "SEARCH RESULTS",
        Tagging => "Tagging location...",
        CameraPermissionDenied => "Unable to access camera. Check permissions.",
        CameraInsecureContext => "Camera access requires a secure (HTTPS or localhost) context.",
        CameraUnavailable => "Camera not available on this device.",
    })
}

// 以下语言缺少相机错误提示，回退到英语

fn pt(key: TextKey) -> Option<&'static str> {
    use TextKey::*;
    Some(match key {
        LevelUp => "SUBIU DE NÍVEL!",
        Level => "Nível",
        TotalXp => "XP Total",
        XpToNext => "XP para o próximo nível",
        Rank => "Nível",
        Reports => "Denúncias",
        Scanning => "Procurando por idiotas...",
        Shielding => "REFORÇANDO CRIPTOGRAFIA...",
        IdiotLogged => "RASCUNHANDO POST",
        NoVehicle => "AVISO: ALVO NÃO é UM VEÍCULO",
        SystemNoVehicle => "O sistema não identificou um veículo nesta imagem.",
        TryAgain => "Voltar para Câmera",
        PostAnon => "Postar Anonimamente",
        AnonWarningTitle => "AVISO ANÔNIMO",
        AnonWarningDesc => "Postagens anônimas não são rastreáveis e não concedem XP. Continuar?",
        TopVigilantes => "MELHORES VIGILANTES",
        PrizeVault => "COFRE DE PRÊMIOS",
        Claim => "Resgatar Recompensa",
        Locked => "Bloqueado",
        You => "VOCÊ",
        NearbyPlaces => "LOCAIS PRÓXIMOS",
        SearchResults => "RESULTADOS",
        Tagging => "Marcando local...",
        _ => return None,
    })
}

fn es(key: TextKey) -> Option<&'static str> {
    use TextKey::*;
    Some(match key {
        LevelUp => "¡SUBISTE DE NIVEL!",
        Level => "Nivel",
        TotalXp => "XP Total",
        XpToNext => "XP para el siguiente nivel",
        Rank => "Rango",
        Reports => "Denuncias",
        Scanning => "Buscando idiotas...",
        Shielding => "REFURZANDO ENCRIPTACIÓN...",
        IdiotLogged => "REDACTANDO POST",
        NoVehicle => "AVISO: EL OBJETIVO NO ES UN VEHÍCULO",
        SystemNoVehicle => "El sistema no pudo identificar un vehículo en esta imagen.",
        TryAgain => "Volver a la Cámara",
        PostAnon => "Publicar de forma anónima",
        AnonWarningTitle => "AVISO ANÓNIMO",
        AnonWarningDesc => "Las publicaciones anónimas no son rastreables y no otorgan XP. ¿Continuar?",
        TopVigilantes => "TOP VIGILANTES",
        PrizeVault => "CÓFRA DE PREMIOS",
        Claim => "Reclamar Recompensa",
        Locked => "Bloqueado",
        You => "TÚ",
        NearbyPlaces => "LUGARES CERCANOS",
        SearchResults => "RESULTADOS",
        Tagging => "Marcando ubicación...",
        _ => return None,
    })
}

fn fr(key: TextKey) -> Option<&'static str> {
    use TextKey::*;
    Some(match key {
        LevelUp => "NIVEAU SUPÉRIEUR !",
        Level => "Niveau",
        TotalXp => "XP Totale",
        XpToNext => "XP vers le niveau suivant",
        Rank => "Rang",
        Reports => "Signalements",
        Scanning => "Recherche d'idiots...",
        Shielding => "RENFORCEMENT DU CHIFFREMENT...",
        IdiotLogged => "RÉDACTION DU POST",
        NoVehicle => "AVERTISSEMENT : LA CIBLE N'EST PAS UN VÉHICULE",
        SystemNoVehicle => "Le système n'a pas pu identifier de véhicule motorisé sur cette image.",
        TryAgain => "Retour à l'Appareil Photo",
        PostAnon => "Poster anonymement",
        AnonWarningTitle => "AVERTISSEMENT ANONYME",
        AnonWarningDesc => "Les posts anonymes sont intraçables et ne rapportent pas d'XP. Continuer ?",
        TopVigilantes => "TOP VIGILANTES",
        PrizeVault => "COFFRE AUX PRIX",
        Claim => "Réclamer la Récompense",
        Locked => "Verrouillé",
        You => "VOUS",
        NearbyPlaces => "LIEUX À PROXIMITÉ",
        SearchResults => "RÉSULTATS",
        Tagging => "Marquage du lieu...",
        _ => return None,
    })
}

fn de(key: TextKey) -> Option<&'static str> {
    use TextKey::*;
    Some(match key {
        LevelUp => "LEVEL UP!",
        Level => "Level",
        TotalXp => "Gesamt-XP",
        XpToNext => "XP bis zum nächsten Level",
        Rank => "Rang",
        Reports => "Meldungen",
        Scanning => "Suche nach Idioten...",
        Shielding => "VERSCHLÜSSELUNG WIRD VERSTÄRKT...",
        IdiotLogged => "POST WIRD ENTWORFEN",
        NoVehicle => "WARNUNG: ZIEL KEIN FAHRZEUG",
        SystemNoVehicle => "System konnte kein Kraftfahrzeug auf diesem Bild identifizieren.",
        TryAgain => "Zurück zur Kamera",
        PostAnon => "Anonym Posten",
        AnonWarningTitle => "ANONYME WARNUNG",
        AnonWarningDesc => "Anonyme Posts sind nicht rückverfolgbar und geben keine XP. Fortfahren?",
        PrizeVault => "PREIS-TRESOR",
        Claim => "Belohnung Beanspruchen",
        Locked => "Gesperrt",
        You => "DU",
        NearbyPlaces => "ORTE IN DER NÄHE",
        SearchResults => "SUCHERGEBNISSE",
        Tagging => "Ort wird markiert...",
        _ => return None,
    })
}

fn ru(key: TextKey) -> Option<&'static str> {
    use TextKey::*;
    Some(match key {
        LevelUp => "НОВЫЙ УРОВЕНЬ!",
        Level => "Уровень",
        TotalXp => "Всего XP",
        XpToNext => "XP до следующего уровня",
        Rank => "Ранг",
        Reports => "Отчеты",
        Scanning => "Поиск идиотов...",
        Shielding => "УСИЛЕНИЕ ШИФРОВАНИЯ...",
        IdiotLogged => "СОЗДАНИЕ ПОСТА",
        NoVehicle => "ПРЕДУПРЕЖДЕНИЕ: ЦЕЛЬ НЕ ТРАНСПОРТ",
        SystemNoVehicle => "Система не смогла идентифицировать транспортное средство на этом изображении.",
        TryAgain => "Вернуться к камере",
        PostAnon => "Опубликовать Анонимно",
        AnonWarningTitle => "АНОНИМНОЕ ПРЕДУПРЕЖДЕНИЕ",
        AnonWarningDesc => "Анонимные посты нельзя отследить, и они не дают XP. Продолжить?",
        TopVigilantes => "ЛУЧШИЕ ВИГИЛАНТЫ",
        PrizeVault => "ХРАНИЛИЩЕ ПРИЗОВ",
        Claim => "Забрать Награду",
        Locked => "Закрыто",
        You => "ВЫ",
        NearbyPlaces => "МЕСТА РЯДОМ",
        SearchResults => "РЕЗУЛЬТАТЫ ПОИСКА",
        Tagging => "Отметка локации...",
        _ => return None,
    })
}

fn nl(key: TextKey) -> Option<&'static str> {
    use TextKey::*;
    Some(match key {
        LevelUp => "LEVEL OMHOOG!",
        Level => "Niveau",
        TotalXp => "Totaal XP",
        XpToNext => "XP tot volgend niveau",
        Rank => "Rang",
        Reports => "Meldingen",
        Scanning => "Zoeken naar idioten...",
        Shielding => "VERSLEUTELING VERSTERKEN...",
        IdiotLogged => "POST WORDT GEMAAKT",
        NoVehicle => "WAARSCHUWING: DOEL GEEN VOERTUIG",
        SystemNoVehicle => "Systeem kon geen motorvoertuig identificeren in deze afbeelding.",
        TryAgain => "Terug naar Camera",
        PostAnon => "Anoniem Posten",
        AnonWarningTitle => "ANONIEME WAARSCHUWING",
        AnonWarningDesc => "Anonieme posts zijn ontraceerbaar en geven geen XP. Doorgaan?",
        TopVigilantes => "TOP VIGILANTES",
        PrizeVault => "PRIJZENKLUIS",
        Claim => "Beloning Claimen",
        Locked => "Vergrendeld",
        You => "JIJ",
        NearbyPlaces => "PLEKKEN IN DE BUURT",
        SearchResults => "ZOEKRESULTATEN",
        Tagging => "Locatie taggen...",
        _ => return None,
    })
}

fn uk(key: TextKey) -> Option<&'static str> {
    use TextKey::*;
    Some(match key {
        LevelUp => "НОВИЙ РІВЕНЬ!",
        Level => "Рівень",
        TotalXp => "Всього XP",
        XpToNext => "XP до наступного рівня",
        Rank => "Ранг",
        Reports => "Звіти",
        Scanning => "Пошук ідіотів...",
        Shielding => "ПОСИЛЕННЯ ШИФРУВАННЯ...",
        IdiotLogged => "СТВОРЕННЯ ПОСТУ",
        NoVehicle => "ПОПЕРЕДЖЕННЯ: ЦІЛЬ НЕ ТРАНСПОРТ",
        SystemNoVehicle => "Система не змогла ідентифікувати транспортний засіб на цьому зображенні.",
        TryAgain => "Повернутися до камери",
        PostAnon => "Опублікувати Анонімно",
        AnonWarningTitle => "АНОНІМНЕ ПОПЕРЕДЖЕННЯ",
        AnonWarningDesc => "Анонімні пости неможливо відстежити, і вони не дають XP. Продовжити?",
        TopVigilantes => "ЛУЧШІ ВІГІЛАНТИ",
        PrizeVault => "СХОВИЩЕ ПРИЗІВ",
        Claim => "Забрати Нагороду",
        Locked => "Закрито",
        You => "ВИ",
        NearbyPlaces => "МІСЦЯ ПОРУЧ",
        SearchResults => "РЕЗУЛЬТАТИ ПОШУКУ",
        Tagging => "Відмітка локації...",
        _ => return None,
    })
}

fn no(key: TextKey) -> Option<&'static str> {
    use TextKey::*;
    Some(match key {
        LevelUp => "NIVÅ OPP!",
        Level => "Nivå",
        TotalXp => "Total XP",
        XpToNext => "XP til neste nivå",
        Rank => "Rang",
        Reports => "Rapporter",
        Scanning => "Leter etter idioter...",
        Shielding => "FORSTERKER KRYPTERING...",
        IdiotLogged => "KLARGJØR INNLEGG",
        NoVehicle => "ADVARSEL: MÅL ER IKKE ET KJØRETØY",
        SystemNoVehicle => "Systemet klarte ikke å identifisere et motorkjøretøy i dette bildet.",
        TryAgain => "Tilbake til Kamera",
        PostAnon => "Post Anonymt",
        AnonWarningTitle => "ANONYM ADVARSEL",
        AnonWarningDesc => "Anonyme innlegg kan ikke spores og gir ikke XP. Fortsett?",
        PrizeVault => "PREMIEHVELV",
        Claim => "Hent Belønning",
        Locked => "Låst",
        You => "DEG",
        NearbyPlaces => "STEDER I NÆRHETEN",
        SearchResults => "SØKERESULTATER",
        Tagging => "Tagger posisjon...",
        _ => return None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_locale_codes() {
        assert_eq!(Locale::from_code("pt"), Some(Locale::Pt));
        assert_eq!(Locale::from_code("pt-BR"), Some(Locale::Pt));
        assert_eq!(Locale::from_code("NO_no"), Some(Locale::No));
        assert_eq!(Locale::from_code("xx"), None);
        assert_eq!(Locale::from_code(""), None);
        for locale in Locale::ALL {
            assert_eq!(Locale::from_code(locale.code()), Some(locale));
        }
    }

    #[test]
    fn test_requested_locale_wins() {
        assert_eq!(lookup(Locale::Pt, TextKey::LevelUp), "SUBIU DE NÍVEL!");
        assert_eq!(text("ru", TextKey::TryAgain), "Вернуться к камере");
    }

    #[test]
    fn test_missing_translation_falls_back_to_english() {
        assert_eq!(lookup(Locale::De, TextKey::TopVigilantes), "TOP VIGILANTES");
        assert_eq!(
            lookup(Locale::Fr, TextKey::CameraPermissionDenied),
            "Unable to access camera. Check permissions."
        );
        assert_eq!(text("xx", TextKey::Locked), "Locked");
    }

    #[test]
    fn test_english_covers_every_key() {
        for key in ALL_KEYS {
            assert!(en(key).is_some(), "missing english text for {}", key.name());
            assert_ne!(lookup(Locale::En, key), key.name());
        }
    }

    #[test]
    fn test_key_names_roundtrip() {
        for key in ALL_KEYS {
            assert_eq!(TextKey::from_name(key.name()), Some(key));
        }
        assert_eq!(TextKey::from_name("nope"), None);
    }
}
