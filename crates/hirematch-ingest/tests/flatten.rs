//! Tests for JSON flattening of the three source documents.

use std::collections::BTreeMap;

use hirematch_ingest::{flatten_applicants, flatten_jobs, flatten_prospects};
use serde_json::{Value, json};

fn as_map(value: Value) -> BTreeMap<String, Value> {
    let Value::Object(map) = value else {
        panic!("expected object");
    };
    map.into_iter().collect()
}

#[test]
fn applicants_flatten_sections_and_keep_resume_text() {
    let source = as_map(json!({
        "101": {
            "infos_basicas": {"nome": "Ana", "email": "ana@example.com"},
            "informacoes_pessoais": {"sexo": "Feminino", "local": "São Paulo, SP"},
            "cv_pt": "5 anos de experiência em python"
        }
    }));
    let df = flatten_applicants(&source).unwrap();
    assert_eq!(df.height(), 1);
    let names = df.get_column_names();
    assert!(names.iter().any(|n| n.as_str() == "applicant_id"));
    assert!(names.iter().any(|n| n.as_str() == "infos_basicas_nome"));
    assert!(
        names
            .iter()
            .any(|n| n.as_str() == "informacoes_pessoais_sexo")
    );
    assert!(names.iter().any(|n| n.as_str() == "cv_pt"));
}

#[test]
fn jobs_only_flatten_known_sections() {
    let source = as_map(json!({
        "900": {
            "informacoes_basicas": {"titulo_vaga": "Dev Python"},
            "perfil_vaga": {"cidade": "Campinas", "nivel_profissional": "Pleno"},
            "beneficios": {"valor_venda": "R$ 10.000"},
            "prospects": [{"codigo": "1"}]
        }
    }));
    let df = flatten_jobs(&source).unwrap();
    assert_eq!(df.height(), 1);
    let names = df.get_column_names();
    assert!(names.iter().any(|n| n.as_str() == "job_id"));
    assert!(names.iter().any(|n| n.as_str() == "perfil_vaga_cidade"));
    // The prospects list is not a job section and must not leak in.
    assert!(!names.iter().any(|n| n.as_str().starts_with("prospects")));
}

#[test]
fn prospects_emit_one_row_per_pair() {
    let source = as_map(json!({
        "900": {
            "titulo": "Dev Python",
            "modalidade": "Remoto",
            "prospects": [
                {"codigo": "101", "situacao_candidado": "Encaminhado ao Requisitante"},
                {"codigo": "102", "situacao_candidado": "Inscrito"}
            ]
        }
    }));
    let df = flatten_prospects(&source).unwrap();
    assert_eq!(df.height(), 2);
    let job_ids: Vec<&str> = df
        .column("job_id")
        .unwrap()
        .str()
        .unwrap()
        .into_no_null_iter()
        .collect();
    assert_eq!(job_ids, vec!["900", "900"]);
    let titles: Vec<&str> = df
        .column("titulo_vaga")
        .unwrap()
        .str()
        .unwrap()
        .into_no_null_iter()
        .collect();
    assert_eq!(titles, vec!["Dev Python", "Dev Python"]);
}

#[test]
fn job_with_zero_prospects_contributes_zero_rows() {
    let source = as_map(json!({
        "900": {"titulo": "Dev Python", "modalidade": "Remoto", "prospects": []},
        "901": {"titulo": "Analista", "modalidade": "Híbrido"}
    }));
    let df = flatten_prospects(&source).unwrap();
    assert_eq!(df.height(), 0);
}

#[test]
fn empty_source_yields_empty_frame() {
    let df = flatten_applicants(&BTreeMap::new()).unwrap();
    assert_eq!(df.height(), 0);
}
