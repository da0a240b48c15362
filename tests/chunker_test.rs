//! 长消息切分的公开接口测试

use noti::notification::{chunk_with, ChunkPolicy};
use noti::{chunk, ChunkError};

fn repeat(c: char, n: usize) -> String {
    std::iter::repeat(c).take(n).collect()
}

#[test]
fn test_concrete_two_line_split() {
    let batches = chunk(&[repeat('a', 3999), repeat('b', 3999)], 4000).unwrap();
    assert_eq!(batches.len(), 2);
    assert_eq!(batches[0].lines().len(), 1);
    assert_eq!(batches[1].lines().len(), 1);
}

#[test]
fn test_concrete_line_too_large() {
    let result = chunk(&[repeat('x', 4000)], 4000);
    assert!(matches!(result, Err(ChunkError::LineTooLarge { .. })));
}

#[test]
fn test_markdown_report_fits_in_few_batches() {
    let mut lines = vec!["# Nightly report".to_string(), String::new()];
    for i in 0..300 {
        lines.push(format!("- job-{:03}: finished in {}s", i, i % 97));
    }

    let batches = chunk(&lines, 4000).unwrap();
    let total: usize = lines.iter().map(|l| l.len() + 1).sum();

    assert!(batches.len() >= total / 4000);
    assert!(batches.len() <= 5);
    assert_eq!(batches[0].lines()[0], "# Nightly report");

    let rejoined: Vec<String> = batches.into_iter().flat_map(|b| b.into_lines()).collect();
    assert_eq!(rejoined, lines);
}

#[test]
fn test_too_many_batches_independent_of_line_count() {
    // 许多小行累计超过 5 批的容量
    let lines: Vec<String> = (0..2000).map(|i| format!("line {:05}", i)).collect();
    assert_eq!(chunk(&lines, 4000), Err(ChunkError::TooManyBatches { max: 5 }));

    let policy = ChunkPolicy {
        ceiling: 4000,
        max_batches: 10,
    };
    let batches = chunk_with(&lines, &policy).unwrap();
    assert!(batches.len() > 5 && batches.len() <= 10);
    assert!(batches.iter().all(|b| b.joined_len() < 4000));
}
