use nutriml::summary::format_number;
use nutriml::{pipeline, PipelineConfig, PipelineError, Predictor};
use std::collections::BTreeMap;
use std::process::ExitCode;

const USAGE: &str = "usage:
  nutriml train <dados.csv> [modelo.bin]
  nutriml predict <modelo.bin> campo=valor [campo=valor ...]";

fn train(args: &[String]) -> Result<(), PipelineError> {
    let Some(data_path) = args.first() else {
        return Err(PipelineError::Configuration(USAGE.to_string()));
    };
    let mut config = PipelineConfig::from_env()?.with_verbose(true);
    if let Some(model_path) = args.get(1) {
        config = config.with_model_path(model_path);
    }

    let report = pipeline::run(data_path, config)?;

    println!("Classes: {}", report.class_labels.join(", "));
    println!(
        "Índice de desenvolvimento médio: {}",
        format_number(report.mean_development_index * 100.0, "", "%", 1)
    );
    for group in &report.development_index_by_region {
        println!(
            "  {:<14} {:>7} ({} domicílios)",
            group.group,
            format_number(group.mean_index * 100.0, "", "%", 1),
            group.count
        );
    }
    println!("\n== Modelo base ==");
    println!("Acurácia: {:.4}", report.baseline.accuracy);
    println!("{}", report.baseline.report);
    println!("== Modelo otimizado ==");
    println!(
        "Melhores parâmetros: n_estimators={} max_depth={:?} min_samples_split={} (CV {:.4})",
        report.best_params.n_estimators,
        report.best_params.max_depth,
        report.best_params.min_samples_split,
        report.best_cv_score
    );
    println!("Acurácia: {:.4}", report.tuned.accuracy);
    println!("{}", report.tuned.report);
    println!("Modelo salvo em {}", report.model_path.display());
    Ok(())
}

fn predict(args: &[String]) -> Result<(), PipelineError> {
    let Some(model_path) = args.first() else {
        return Err(PipelineError::Configuration(USAGE.to_string()));
    };
    let mut form = BTreeMap::new();
    for field in &args[1..] {
        let Some((name, value)) = field.split_once('=') else {
            return Err(PipelineError::Configuration(format!(
                "expected campo=valor, got '{}'",
                field
            )));
        };
        form.insert(name.trim().to_string(), value.to_string());
    }

    let predictor = Predictor::load(model_path)?;
    let prediction = predictor.predict_form(&form)?;
    println!(
        "{} (confiança {})",
        prediction.label,
        format_number(prediction.confidence * 100.0, "", "%", 1)
    );
    Ok(())
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let result = match args.first().map(String::as_str) {
        Some("train") => train(&args[1..]),
        Some("predict") => predict(&args[1..]),
        _ => Err(PipelineError::Configuration(USAGE.to_string())),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", e);
            ExitCode::FAILURE
        }
    }
}
