//! Tests for the processing API

#[cfg(test)]
mod api_tests {
    use std::sync::Arc;

    use crate::api::*;
    use crate::error::RuleError;
    use crate::rules::get_rules;
    use crate::types::SegmentType;

    fn texts(segments: &[crate::types::Segment]) -> Vec<&str> {
        segments.iter().map(|s| s.text.as_str()).collect()
    }

    #[test]
    fn test_segmenter_creation() {
        let segmenter = Segmenter::for_product("cosmetics").unwrap();
        assert_eq!(segmenter.rules().product(), "cosmetics");
        assert_eq!(segmenter.config(), &SegmenterConfig::default());

        let config = SegmenterConfig::builder().short_fragment(10).build().unwrap();
        let custom = Segmenter::with_config(get_rules("quasi_drug").unwrap(), config).unwrap();
        assert_eq!(custom.config().short_fragment(), 10);
    }

    #[test]
    fn test_unknown_product_fails_at_construction() {
        let err = Segmenter::for_product("shampoo").unwrap_err();
        assert!(matches!(
            err,
            Error::Rules(RuleError::UnknownProduct { ref product }) if product == "shampoo"
        ));
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let config = SegmenterConfig {
            overlap_ratio: 2.0,
            ..Default::default()
        };
        let result = Segmenter::with_config(get_rules("cosmetics").unwrap(), config);
        assert!(matches!(result, Err(Error::Configuration(_))));
    }

    #[test]
    fn test_segmenter_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Segmenter>();
    }

    #[test]
    fn test_empty_input() {
        let segmenter = Segmenter::for_product("cosmetics").unwrap();
        assert!(segmenter.segment("").is_empty());

        let output = segmenter.process(Input::from_text("")).unwrap();
        assert!(output.segments.is_empty());
        assert_eq!(output.metadata.coverage.ratio, 1.0);
        assert_eq!(output.metadata.stats.token_count, 0);
    }

    #[test]
    fn test_marker_stays_with_claim_and_definition_is_dropped() {
        let segmenter = Segmenter::for_product("cosmetics").unwrap();
        let segments = segmenter.segment("X※1\n※1：definition");

        assert_eq!(texts(&segments), vec!["X※1"]);
        assert_eq!(segments[0].id, "seg_001");
        assert_eq!(segments[0].position.start, 0);
    }

    #[test]
    fn test_fragment_after_marker_is_rejoined() {
        let segmenter = Segmenter::for_product("quasi_drug").unwrap();
        let text = "殺菌※2する薬用ジェル";
        let segments = segmenter.segment(text);

        assert_eq!(texts(&segments), vec![text]);
        assert_eq!(segments[0].segment_type, SegmentType::Claim);
    }

    #[test]
    fn test_copy_before_annotated_keyword_is_kept() {
        let segmenter = Segmenter::for_product("quasi_drug").unwrap();
        let text = "毎日のケアにうれしい、なめらかなテクスチャーの薬用ジェルです。うるおう。美白※1\n\
                    ※1：メラニンの生成を抑え、シミを防ぐ";
        let output = segmenter.process(Input::from_text(text)).unwrap();
        let texts = texts(&output.segments);

        assert!(texts.iter().any(|t| t.contains("うるおう。")));
        assert_eq!(texts.last(), Some(&"美白※1"));
        let coverage = &output.metadata.coverage;
        assert_eq!(coverage.covered_chars, coverage.total_chars);
    }

    #[test]
    fn test_header_after_marker_stays_its_own_segment() {
        let segmenter = Segmenter::for_product("quasi_drug").unwrap();
        let segments = segmenter.segment("美白※1【期間限定】\n※1：メラニンの生成を抑え、シミを防ぐ");

        assert_eq!(texts(&segments), vec!["美白※1", "【期間限定】"]);
    }

    #[test]
    fn test_header_wins_over_keyword_inside_it() {
        let segmenter = Segmenter::for_product("cosmetics").unwrap();
        let segments = segmenter.segment("【美白効果】のご案内");

        assert_eq!(texts(&segments), vec!["【美白効果】", "のご案内"]);
        assert_eq!(segments[0].segment_type, SegmentType::Claim);
        assert_eq!(segments[1].segment_type, SegmentType::Explanation);
    }

    #[test]
    fn test_urgency_offer_is_one_segment() {
        let segmenter = Segmenter::for_product("cosmetics").unwrap();
        let text = "いまならアンケート回答で半額の1,815円（税込）でスタート可能";
        let segments = segmenter.segment(text);

        assert_eq!(texts(&segments), vec![text]);
        assert_eq!(segments[0].segment_type, SegmentType::Claim);
    }

    #[test]
    fn test_evidence_cue_types_segment() {
        let segmenter = Segmenter::for_product("cosmetics").unwrap();
        let segments = segmenter.segment("満足度95%※1\n※1：自社調べ");

        assert_eq!(texts(&segments), vec!["満足度95%※1"]);
        assert_eq!(segments[0].segment_type, SegmentType::Evidence);
    }

    #[test]
    fn test_process_metadata() {
        let segmenter = Segmenter::new(get_rules("cosmetics").unwrap());
        let text = "ヒアルロン酸※1配合。\nしっとり続く。\n※1：保湿成分";
        let output = segmenter.process(Input::from_text(text)).unwrap();

        let stats = &output.metadata.stats;
        assert_eq!(output.metadata.product, "cosmetics");
        assert_eq!(stats.bytes_processed, text.len());
        assert_eq!(stats.chars_processed, text.chars().count());
        assert_eq!(stats.segment_count, output.segments.len());
        assert!(stats.merged_count >= 1);
        assert_eq!(
            stats.by_type.values().sum::<usize>(),
            output.segments.len()
        );
        assert_eq!(output.metadata.coverage.ratio, 1.0);
    }

    #[test]
    fn test_debug_exposes_pipeline_state() {
        let segmenter = Segmenter::for_product("quasi_drug").unwrap();
        let text = "殺菌※2する薬用ジェル";
        let debug = segmenter.debug(text);

        assert_eq!(debug.tokens.len(), 3);
        assert!(debug.candidates.iter().any(|c| c.merged));
        assert!(debug
            .candidates
            .windows(2)
            .all(|w| w[0].priority >= w[1].priority));
        assert_eq!(debug.segments, segmenter.segment(text));
    }

    #[test]
    fn test_shared_across_threads() {
        let segmenter = Arc::new(Segmenter::for_product("cosmetics").unwrap());
        let text = "【新発売】美白※1美容液。\n※1：メラニンの生成を抑え、シミ・そばかすを防ぐ";
        let expected = segmenter.segment(text);

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let segmenter = Arc::clone(&segmenter);
                std::thread::spawn(move || segmenter.segment(text))
            })
            .collect();
        for handle in handles {
            assert_eq!(handle.join().unwrap(), expected);
        }
    }
}
