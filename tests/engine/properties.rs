//! Property tests over the scripted provider

use crate::common::*;
use proptest::prelude::*;

fn providers(n: usize, page: usize) -> Vec<ScriptedProvider> {
    vec![
        ScriptedProvider::offset(corpus(n), page),
        ScriptedProvider::offset(corpus(n), page).without_total(),
        ScriptedProvider::offset(corpus(n), page).serving_at_most((page / 2).max(1)),
        ScriptedProvider::cursor(corpus(n), page),
        ScriptedProvider::cursor(corpus(n), page).without_total(),
        ScriptedProvider::unpaged(corpus(n)),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn random_access_fetches_at_most_one_page(
        n in 0usize..120,
        page in 1usize..30,
        index in 0usize..150,
    ) {
        let (qs, transport) = queryset(ScriptedProvider::offset(corpus(n), page));
        match qs.at(index) {
            Ok(item) => {
                prop_assert!(index < n);
                prop_assert_eq!(item.id, format!("item-{}", index));
            }
            Err(e) => {
                prop_assert!(index >= n);
                prop_assert!(e.is_out_of_range());
            }
        }
        prop_assert_eq!(requested_offsets(&transport), vec![index / page * page]);
    }

    #[test]
    fn every_paging_idiom_counts_and_lists_the_same(n in 0usize..80, page in 1usize..25) {
        for provider in providers(n, page) {
            let (qs, _) = queryset(provider);
            prop_assert_eq!(qs.count().unwrap(), n);
            prop_assert_eq!(ids(&qs.to_vec().unwrap()), id_range(0, n));
        }
    }

    #[test]
    fn slices_match_the_corpus(
        n in 0usize..80,
        page in 1usize..25,
        start in 0usize..90,
        len in 0usize..40,
    ) {
        let expected = id_range(start.min(n), (start + len).min(n));
        for provider in providers(n, page) {
            let (qs, _) = queryset(provider);
            let view = qs.slice(start..start + len);
            prop_assert_eq!(view.count().unwrap(), expected.len());
            prop_assert_eq!(ids(&view.to_vec().unwrap()), expected.clone());
        }
    }

    #[test]
    fn blocking_and_async_agree(
        n in 0usize..100,
        page in 1usize..25,
        picks in proptest::collection::vec(0usize..110, 0..8),
    ) {
        for provider in providers(n, page) {
            let (blocking, blocking_transport) = queryset(provider.clone());
            let (nonblocking, async_transport) = queryset(provider);

            let expected: Vec<Option<String>> =
                picks.iter().map(|&i| blocking.at(i).ok().map(|item| item.id)).collect();
            let actual: Vec<Option<String>> = tokio_test::block_on(async {
                let mut out = Vec::with_capacity(picks.len());
                for &i in &picks {
                    out.push(nonblocking.at_async(i).await.ok().map(|item| item.id));
                }
                out
            });

            prop_assert_eq!(expected, actual);
            prop_assert_eq!(blocking_transport.requests(), async_transport.requests());
        }
    }

    #[test]
    fn chained_filters_equal_merged_filters(
        parity in prop_oneof![Just("even"), Just("odd")],
        first_rank in 0i64..20,
        second_rank in 0i64..20,
    ) {
        let (qs, _) = queryset(ScriptedProvider::offset(corpus(20), 6));
        let chained = qs.filter("parity", parity).filter("rank", first_rank).filter("rank", second_rank);
        let merged = qs.filter_many([
            ("parity", patent_client::Criterion::from(parity)),
            ("rank", patent_client::Criterion::from(second_rank)),
        ]);
        prop_assert_eq!(&chained, &merged);
        prop_assert_eq!(chained.to_vec().unwrap(), merged.to_vec().unwrap());
    }

    #[test]
    fn iteration_and_indexing_agree(n in 0usize..60, page in 1usize..20) {
        for provider in providers(n, page) {
            let (qs, _) = queryset(provider);
            let before = qs.count().unwrap();
            let walked = qs.to_vec().unwrap();
            for (i, item) in walked.iter().enumerate() {
                prop_assert_eq!(&qs.at(i).unwrap(), item);
            }
            prop_assert!(qs.at(walked.len()).unwrap_err().is_out_of_range());
            prop_assert_eq!(qs.count().unwrap(), before);
        }
    }
}
