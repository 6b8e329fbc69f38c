//! Model-checked interleavings. Run with `cargo xtask loom`.
#![cfg(loom)]

use core::convert::Infallible;

use donelist::{CompletionList, DrainOptions, WorkItem};
use loom::sync::Arc;
use loom::thread;

#[test]
fn loom_concurrent_pushes_are_all_stolen() {
    loom::model(|| {
        let list = Arc::new(CompletionList::new());

        let producers: Vec<_> = (0..2u32)
            .map(|t| {
                let list = Arc::clone(&list);
                thread::spawn(move || list.push(WorkItem::new(t, t)))
            })
            .collect();
        for p in producers {
            p.join().unwrap();
        }

        let mut ids: Vec<u32> = list.steal().unwrap().ids().copied().collect();
        ids.sort_unstable();
        assert_eq!(ids, vec![0, 1]);
        assert!(list.steal().is_none());
    });
}

#[test]
fn loom_steal_racing_push_loses_nothing() {
    loom::model(|| {
        let list = Arc::new(CompletionList::new());
        list.push(WorkItem::new(0u32, 0u32));

        let producer = {
            let list = Arc::clone(&list);
            thread::spawn(move || list.push_batch([WorkItem::new(1, 1), WorkItem::new(2, 2)]))
        };

        let mut seen = Vec::new();
        let mut record = |id: &u32| {
            seen.push(*id);
            Ok::<(), Infallible>(())
        };
        list.drain(
            &mut |_: &u32| Ok::<(), Infallible>(()),
            &mut record,
            &DrainOptions::default(),
        )
        .unwrap();

        producer.join().unwrap();
        list.drain(
            &mut |_: &u32| Ok::<(), Infallible>(()),
            &mut record,
            &DrainOptions::default(),
        )
        .unwrap();

        seen.sort_unstable();
        assert_eq!(seen, vec![0, 1, 2]);
        assert!(list.is_empty());
    });
}
