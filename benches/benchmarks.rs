use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use casexport::{Cas, Config, ToConllu, ToJson, ToTsv, TypeSystem};

const CARGO_MANIFEST_DIR: &'static str = env!("CARGO_MANIFEST_DIR");

/// Builds a document of `n` tokens, each with lemma, part-of-speech and (for every third token) a
/// DEAF definition and a named entity
fn synthetic_xmi(n: usize) -> String {
    let mut text = String::new();
    let mut body = String::new();
    let mut members = String::new();
    let mut id = 10;
    for i in 0..n {
        let begin = i * 5;
        text.push_str("word");
        let end = begin + 4;
        text.push(' ');
        body.push_str(&format!(
            "<type:Lemma xmi:id=\"{}\" sofa=\"1\" begin=\"{}\" end=\"{}\" value=\"word\"/>\n",
            id, begin, end
        ));
        body.push_str(&format!(
            "<pos:POS xmi:id=\"{}\" sofa=\"1\" begin=\"{}\" end=\"{}\" PosValue=\"NN\" coarseValue=\"NOUN\"/>\n",
            id + 1, begin, end
        ));
        body.push_str(&format!(
            "<type:Token xmi:id=\"{}\" sofa=\"1\" begin=\"{}\" end=\"{}\" lemma=\"{}\" pos=\"{}\"/>\n",
            id + 2, begin, end, id, id + 1
        ));
        let mut count = 3;
        if i % 3 == 0 {
            body.push_str(&format!(
                "<custom:DictDEAF xmi:id=\"{}\" sofa=\"1\" begin=\"{}\" end=\"{}\"><DictionaryDefinitionDEAF>definition {}</DictionaryDefinitionDEAF></custom:DictDEAF>\n",
                id + 3, begin, end, i
            ));
            body.push_str(&format!(
                "<ner:NamedEntity xmi:id=\"{}\" sofa=\"1\" begin=\"{}\" end=\"{}\" value=\"PER\"/>\n",
                id + 4, begin, end
            ));
            count = 5;
        }
        for member in id..id + count {
            members.push_str(&format!("{} ", member));
        }
        id += count;
    }
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<xmi:XMI xmlns:pos="http:///de/tudarmstadt/ukp/dkpro/core/api/lexmorph/type/pos.ecore" xmlns:xmi="http://www.omg.org/XMI" xmlns:cas="http:///uima/cas.ecore" xmlns:type="http:///de/tudarmstadt/ukp/dkpro/core/api/segmentation/type.ecore" xmlns:ner="http:///de/tudarmstadt/ukp/dkpro/core/api/ner/type.ecore" xmlns:custom="http:///webanno/custom.ecore" xmi:version="2.0">
<cas:NULL xmi:id="0"/>
{}<cas:Sofa xmi:id="1" sofaNum="1" sofaID="_InitialView" mimeType="text" sofaString="{}"/>
<cas:View sofa="1" members="{}"/>
</xmi:XMI>"#,
        body,
        text,
        members.trim_end()
    )
}

pub fn bench_export(c: &mut Criterion) {
    let typesystem_file = format!("{}/tests/data/typesystem.xml", CARGO_MANIFEST_DIR);
    let typesystem = TypeSystem::from_file(&typesystem_file, &Config::default()).unwrap();

    let mut group = c.benchmark_group("load");
    for n in [100, 1000, 10000] {
        let xml = synthetic_xmi(n);
        group.throughput(Throughput::Elements(n as u64));
        group.bench_with_input(BenchmarkId::from_parameter(n), &xml, |b, xml| {
            b.iter(|| {
                let cas =
                    Cas::from_xmi_str(black_box(xml), typesystem.clone(), Config::default())
                        .unwrap();
                assert!(!cas.is_empty());
            })
        });
    }
    group.finish();

    let cas = Cas::from_xmi_str(&synthetic_xmi(10000), typesystem, Config::default()).unwrap();

    c.bench_function("to_conllu_string", |b| {
        b.iter(|| {
            let conllu = black_box(&cas).to_conllu_string().unwrap();
            assert!(!conllu.is_empty());
        })
    });

    c.bench_function("to_json_string", |b| {
        b.iter(|| {
            let json = black_box(&cas).to_json_string().unwrap();
            assert!(!json.is_empty());
        })
    });

    c.bench_function("to_tsv_string", |b| {
        b.iter(|| {
            let tsv = black_box(&cas).to_tsv_string().unwrap();
            assert!(!tsv.is_empty());
        })
    });
}

criterion_group!(benches, bench_export);
criterion_main!(benches);
