use codeoutline_kotlin::{KotlinParser, OutlineParser, ParserConfig, SourceFile};
use criterion::{black_box, criterion_group, criterion_main, Criterion};

const SIMPLE_CLASS: &str = r#"
class HelloWorld {
    fun main() {
        println("Hello, World!")
    }
}
"#;

const COMPLEX_CLASS: &str = r#"
package com.example.app

import java.util.ArrayList
import kotlinx.coroutines.Dispatchers
import kotlinx.coroutines.withContext

/**
 * A complex class with multiple methods and inheritance
 */
class ComplexClass(
    private val name: String,
    private val value: Int
) : BaseClass(), Serializable, Comparable<ComplexClass> {

    private val items: MutableList<String> = ArrayList()

    var label: String = ""
        private set

    fun getName(): String = name

    fun addItem(item: String) {
        items.add(item)
    }

    fun <R> mapItems(transform: (String) -> R): List<R> = items.map(transform)

    override fun compareTo(other: ComplexClass): Int {
        return value.compareTo(other.value)
    }

    suspend fun fetchData(): String = withContext(Dispatchers.IO) {
        "data"
    }

    enum class Mode { FAST, SAFE }

    companion object {
        const val DEFAULT_VALUE = 42

        fun create(name: String): ComplexClass = ComplexClass(name, DEFAULT_VALUE)
    }
}

fun String.shout(): String = uppercase() + "!"
"#;

fn bench_simple_parsing(c: &mut Criterion) {
    let parser = KotlinParser::new();

    c.bench_function("parse_simple_class", |b| {
        b.iter(|| parser.parse(black_box(SIMPLE_CLASS), "HelloWorld.kt"))
    });
}

fn bench_complex_parsing(c: &mut Criterion) {
    let parser = KotlinParser::new();

    c.bench_function("parse_complex_class", |b| {
        b.iter(|| parser.parse(black_box(COMPLEX_CLASS), "ComplexClass.kt"))
    });
}

fn bench_batch_parsing(c: &mut Criterion) {
    let files: Vec<SourceFile> = (0..64)
        .map(|i| SourceFile::new(format!("File{i}.kt"), COMPLEX_CLASS))
        .collect();

    let sequential = KotlinParser::new();
    c.bench_function("parse_batch_sequential", |b| {
        b.iter(|| sequential.parse_batch(black_box(&files)))
    });

    let parallel = KotlinParser::with_config(ParserConfig::default().with_parallel(true));
    c.bench_function("parse_batch_parallel", |b| {
        b.iter(|| parallel.parse_batch(black_box(&files)))
    });
}

criterion_group!(
    benches,
    bench_simple_parsing,
    bench_complex_parsing,
    bench_batch_parsing
);
criterion_main!(benches);
