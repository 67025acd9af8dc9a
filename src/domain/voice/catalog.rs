//! 音色目录排序规则
//!
//! 目录顺序直接展示给用户，必须对相同输入稳定可复现

use std::cmp::Ordering;

use super::Voice;

/// 目录比较函数：先按语言代码字典序，再按显示名字典序
#[inline]
fn catalog_order(a: &Voice, b: &Voice) -> Ordering {
    a.language_code()
        .as_str()
        .cmp(b.language_code().as_str())
        .then_with(|| a.display_name().cmp(b.display_name()))
}

/// 原地排序目录（稳定排序，完全相同的键保持输入顺序）
pub fn sort_catalog(voices: &mut [Voice]) {
    voices.sort_by(catalog_order);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::voice::{Gender, LanguageCode, VoiceId};

    fn voice(id: &str, lang: LanguageCode) -> Voice {
        Voice::new(VoiceId::new(id).unwrap(), id, lang, Gender::Female)
    }

    fn ids(voices: &[Voice]) -> Vec<&str> {
        voices.iter().map(|v| v.id().as_str()).collect()
    }

    #[test]
    fn test_language_then_name() {
        let mut voices = vec![
            voice("Matthew", LanguageCode::EnUs),
            voice("Joanna", LanguageCode::EnUs),
            voice("Brian", LanguageCode::EnGb),
            voice("Amy", LanguageCode::EnGb),
        ];
        sort_catalog(&mut voices);
        // "en-GB" < "en-US"
        assert_eq!(ids(&voices), vec!["Amy", "Brian", "Joanna", "Matthew"]);
    }

    #[test]
    fn test_order_independent_of_input_order() {
        let mut forward = vec![
            voice("Ruth", LanguageCode::EnUs),
            voice("Arthur", LanguageCode::EnGb),
            voice("Danielle", LanguageCode::EnUs),
        ];
        let mut reversed: Vec<Voice> = forward.iter().rev().cloned().collect();
        sort_catalog(&mut forward);
        sort_catalog(&mut reversed);
        assert_eq!(forward, reversed);
    }

    #[test]
    fn test_equal_keys_keep_input_order() {
        let a = Voice::new(VoiceId::new("Kevin-1").unwrap(), "Kevin", LanguageCode::EnUs, Gender::Male);
        let b = Voice::new(VoiceId::new("Kevin-2").unwrap(), "Kevin", LanguageCode::EnUs, Gender::Male);
        let mut voices = vec![a, b];
        sort_catalog(&mut voices);
        assert_eq!(ids(&voices), vec!["Kevin-1", "Kevin-2"]);
    }
}
