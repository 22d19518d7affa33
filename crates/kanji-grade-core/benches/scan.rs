use criterion::{Criterion, black_box, criterion_group, criterion_main};
use kanji_grade_core::{
    ClassificationIndex, DocumentText, GradeDefinitions, ScanOptions, scan_document,
};

fn large_text(line_count: usize) -> String {
    let mut out = String::with_capacity(line_count * 96);
    for i in 0..line_count {
        out.push_str(&format!(
            "{i:06} 吾輩は猫である。名前はまだ無い。どこで生れたかとんと見当がつかぬ。\n"
        ));
    }
    // Remove the final '\n' to avoid creating an extra trailing empty line.
    out.pop();
    out
}

fn bench_build_index(c: &mut Criterion) {
    let definitions = GradeDefinitions::builtin();
    c.bench_function("index_build/builtin", |b| {
        b.iter(|| black_box(ClassificationIndex::build(black_box(&definitions))))
    });
}

fn bench_scan_document(c: &mut Criterion) {
    let index = ClassificationIndex::build(&GradeDefinitions::builtin());
    let options = ScanOptions::for_index(&index);
    let document = DocumentText::from_text(&large_text(10_000));

    c.bench_function("scan/10k_lines", |b| {
        b.iter(|| black_box(scan_document(black_box(&document), &index, &options)))
    });
}

criterion_group!(benches, bench_build_index, bench_scan_document);
criterion_main!(benches);
