//! End-to-end tests over the committed fixture dictionaries.
//!
//! The fixture HMM model is a hand-checkable toy: 甲 strongly emits B,
//! 乙 emits E, 丙 emits S, so 甲乙 decodes to one word and 丙 stands alone.

use std::path::{Path, PathBuf};

use libsegment_core::unicode::words_to_strings;
use libsegment_core::{Config, Segmentor};

fn data(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests/data")
        .join(name)
}

fn segmentor() -> Segmentor {
    Segmentor::from_paths(
        data("dict.utf8"),
        data("hmm_model.utf8"),
        None,
        Some(data("idf.utf8").as_path()),
        Some(data("stop_words.utf8").as_path()),
    )
    .unwrap()
}

fn segmentor_with_user_dict() -> Segmentor {
    Segmentor::from_paths(
        data("dict.utf8"),
        data("hmm_model.utf8"),
        Some(data("user.dict.utf8").to_str().unwrap()),
        None,
        None,
    )
    .unwrap()
}

fn joined(words: &[libsegment_core::Word]) -> String {
    words_to_strings(words).join("/")
}

#[test]
fn mix_cut_splices_hmm_into_dictionary_gaps() {
    let seg = segmentor();
    // 甲乙 is out of vocabulary: MP leaves two singles, the HMM joins them.
    assert_eq!(joined(&seg.cut("南京市甲乙长江", true)), "南京市/甲乙/长江");
    assert_eq!(joined(&seg.cut("南京市甲乙长江", false)), "南京市/甲/乙/长江");
}

#[test]
fn mp_cut_without_hmm_keeps_separators() {
    let seg = segmentor();
    assert_eq!(
        joined(&seg.cut("我来自北京邮电大学。", false)),
        "我/来自/北京邮电大学/。"
    );
}

#[test]
fn cut_small_caps_word_length() {
    let seg = segmentor();
    assert_eq!(joined(&seg.cut_small("南京市长江大桥", 3)), "南京市/长江/大桥");
    assert_eq!(
        joined(&seg.cut_small("南京市长江大桥", 0)),
        "南/京/市/长/江/大/桥"
    );
}

#[test]
fn cut_all_enumerates_dictionary_hits() {
    let seg = segmentor();
    assert_eq!(
        joined(&seg.cut_all("我来自北京邮电大学")),
        "我/来自/北京/北京邮电大学/邮电/电大/大学"
    );
}

#[test]
fn cut_for_search_expands_long_tokens() {
    let seg = segmentor();
    assert_eq!(
        joined(&seg.cut_for_search("中国科学院计算所", true)),
        "中国/科学/学院/科学院/中国科学院/计算/计算所"
    );
}

#[test]
fn cut_hmm_handles_ascii_runs() {
    let seg = segmentor();
    assert_eq!(joined(&seg.cut_hmm("IBM,1.2,123")), "IBM/,/1.2/,/123");
    assert_eq!(joined(&seg.cut_hmm("甲乙丙")), "甲乙/丙");
}

#[test]
fn byte_coverage_and_offset_monotonicity() {
    let seg = segmentor();
    for sentence in [
        "我来自北京邮电大学。。。学号123456，用AK47",
        "南京市长江大桥",
        "中国科学院计算所，甲乙丙",
    ] {
        for words in [seg.cut(sentence, true), seg.cut(sentence, false)] {
            assert_eq!(words_to_strings(&words).concat(), sentence);
            let mut offset = 0u32;
            let mut rune_offset = 0u32;
            for w in &words {
                assert_eq!(w.offset, offset);
                assert_eq!(w.rune_offset, rune_offset);
                offset += w.text.len() as u32;
                rune_offset += w.rune_len;
            }
        }
    }
}

#[test]
fn every_mix_token_appears_in_search_output() {
    let seg = segmentor();
    let sentence = "中国科学院计算所，南京市长江大桥";
    let mix = seg.cut(sentence, true);
    let search = seg.cut_for_search(sentence, true);
    for token in &mix {
        assert!(
            search.iter().any(|w| w == token),
            "mix token {token:?} missing from search output"
        );
    }
}

#[test]
fn tagging_combines_dict_tags_and_heuristics() {
    let seg = segmentor();
    let tags = seg.tag("我来自北京邮电大学。用AK47");
    let rendered: Vec<String> = tags.iter().map(|(w, t)| format!("{w}:{t}")).collect();
    assert_eq!(
        rendered.join(", "),
        "我:r, 来自:v, 北京邮电大学:nt, 。:x, 用:x, AK47:eng"
    );
    assert_eq!(seg.lookup_tag("长江"), "ns");
    assert_eq!(seg.lookup_tag("123456"), "m");
    assert_eq!(seg.lookup_tag("iPhone6"), "eng");
}

#[test]
fn every_base_entry_round_trips_through_the_trie() {
    let seg = segmentor();
    let content = std::fs::read_to_string(data("dict.utf8")).unwrap();
    for line in content.lines() {
        let fields: Vec<&str> = line.split_whitespace().collect();
        let &[word, _freq, tag] = fields.as_slice() else {
            panic!("fixture line {line:?}")
        };
        assert!(seg.find(word), "missing {word}");
        assert_eq!(seg.lookup_tag(word), tag, "tag mismatch for {word}");
    }
}

#[test]
fn user_dict_wins_over_singles() {
    let seg = segmentor_with_user_dict();
    assert_eq!(joined(&seg.cut("云计算", true)), "云计算");
    assert_eq!(seg.lookup_tag("蓝翔"), "nz");

    // Without the user dictionary 云 is an unknown single.
    let bare = segmentor();
    assert_eq!(joined(&bare.cut("云计算", true)), "云/计算");
}

#[test]
fn insert_and_delete_user_words() {
    let mut seg = segmentor();
    assert!(!seg.find("量子计算"));
    assert!(seg.insert_user_word("量子计算", Some(80), "n"));
    assert!(seg.find("量子计算"));
    assert_eq!(joined(&seg.cut("量子计算", false)), "量子计算");
    assert_eq!(seg.lookup_tag("量子计算"), "n");

    assert!(seg.delete_user_word("量子计算"));
    assert!(!seg.find("量子计算"));
    assert_eq!(joined(&seg.cut("量子计算", false)), "量/子/计算");
}

#[test]
fn reset_separators_rejects_duplicates() {
    let mut seg = segmentor();
    assert!(!seg.reset_separators("。，。"));
    // The old set is intact: 。 still separates.
    assert_eq!(joined(&seg.cut("你好。世界", false)), "你好/。/世界");

    assert!(seg.reset_separators("、"));
    assert_eq!(joined(&seg.cut("你好、世界", false)), "你好/、/世界");
}

#[test]
fn tfidf_extraction_matches_hand_computation() {
    let seg = segmentor();
    let kws = seg.extract_tfidf("你好世界世界而且而且", 5);
    assert_eq!(kws.len(), 2);
    assert_eq!(kws[0].word, "世界");
    assert!((kws[0].weight - 16.0).abs() < 1e-3);
    assert_eq!(kws[0].offsets, vec![6, 12]);
    assert_eq!(kws[1].word, "你好");
    assert!((kws[1].weight - 10.0).abs() < 1e-3);
}

#[test]
fn textrank_scores_are_rescaled_into_unit_range() {
    let seg = segmentor();
    let kws = seg.extract_textrank("你好世界世界而且而且你好计算", 5);
    assert!(!kws.is_empty());
    assert!((kws[0].weight - 1.0).abs() < 1e-9);
    for kw in &kws {
        assert!(kw.weight > 0.0 && kw.weight <= 1.0);
    }
    // Descending weights.
    for pair in kws.windows(2) {
        assert!(pair[0].weight >= pair[1].weight);
    }
}

#[test]
fn builds_from_toml_config() {
    let mut config = Config::default();
    config.dict_path = data("dict.utf8");
    config.hmm_model_path = data("hmm_model.utf8");
    config.idf_path = Some(data("idf.utf8"));
    config.stop_words_path = Some(data("stop_words.utf8"));
    config.max_word_len = 3;

    let path = std::env::temp_dir().join("libsegment_pipeline_config.toml");
    config.save_toml(&path).unwrap();
    let seg = Segmentor::from_config(&Config::load_toml(&path).unwrap()).unwrap();
    let _ = std::fs::remove_file(path);

    // max_word_len 3 bars 北京邮电大学 even in mix mode.
    assert_eq!(
        joined(&seg.cut("我来自北京邮电大学", false)),
        "我/来自/北京/邮电/大学"
    );
}
