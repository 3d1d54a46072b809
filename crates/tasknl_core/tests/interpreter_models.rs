use chrono::NaiveDate;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tasknl_core::{
    Action, BioTag, CommandAssembler, CommandInterpreter, DecodeError, IntentModel,
    IntentPrediction, InterpretError, InterpreterConfig, LabelTable, ModelError, ModelLoader,
    SlotModel, SlotPrediction,
};

struct FixedIntent {
    action: &'static str,
    confidence: f64,
}

impl IntentModel for FixedIntent {
    fn classify(&self, _text: &str) -> Result<IntentPrediction, ModelError> {
        Ok(IntentPrediction {
            action: self.action.to_string(),
            confidence: self.confidence,
        })
    }
}

/// Tags one token per character with the configured labels.
struct PerCharSlots {
    labels: LabelTable,
    tags: Vec<&'static str>,
    drop_last_prediction: bool,
}

impl SlotModel for PerCharSlots {
    fn predict(&self, text: &str) -> Result<SlotPrediction, ModelError> {
        let count = text.chars().count();
        let offsets = (0..count).map(|i| (i, i + 1)).collect();
        let mut label_ids: Vec<u32> = (0..count)
            .map(|i| {
                let tag = self.tags.get(i).copied().unwrap_or("O");
                self.labels.id_of(BioTag::parse(tag).unwrap()).unwrap()
            })
            .collect();
        if self.drop_last_prediction {
            label_ids.pop();
        }
        Ok(SlotPrediction { offsets, label_ids })
    }

    fn label_table(&self) -> &LabelTable {
        &self.labels
    }
}

#[derive(Default)]
struct FakeLoader {
    action: &'static str,
    tags: Vec<&'static str>,
    drop_last_prediction: bool,
    failing_intent_loads: AtomicUsize,
    intent_loads: AtomicUsize,
    slot_loads: AtomicUsize,
}

impl ModelLoader for FakeLoader {
    fn load_intent(&self, dir: &Path) -> Result<Arc<dyn IntentModel>, ModelError> {
        self.intent_loads.fetch_add(1, Ordering::SeqCst);
        let failing = self.failing_intent_loads.load(Ordering::SeqCst);
        if failing > 0 {
            self.failing_intent_loads.store(failing - 1, Ordering::SeqCst);
            return Err(ModelError::Load {
                dir: dir.display().to_string(),
                message: "weights missing".to_string(),
            });
        }
        Ok(Arc::new(FixedIntent {
            action: self.action,
            confidence: 0.87,
        }))
    }

    fn load_slots(&self, _dir: &Path) -> Result<Arc<dyn SlotModel>, ModelError> {
        self.slot_loads.fetch_add(1, Ordering::SeqCst);
        Ok(Arc::new(PerCharSlots {
            labels: LabelTable::canonical(),
            tags: self.tags.clone(),
            drop_last_prediction: self.drop_last_prediction,
        }))
    }
}

fn assembler() -> CommandAssembler {
    CommandAssembler::new(NaiveDate::from_ymd_opt(2026, 3, 14).unwrap())
}

fn interpreter(loader: FakeLoader) -> CommandInterpreter<FakeLoader> {
    CommandInterpreter::new(InterpreterConfig::default(), loader)
}

#[test]
fn interprets_text_through_both_models() {
    let interpreter = interpreter(FakeLoader {
        action: " ADD ",
        tags: vec!["B-TITLE", "I-TITLE", "B-DATE", "I-DATE"],
        ..FakeLoader::default()
    });

    let command = interpreter.interpret_with("买菜明天", &assembler()).unwrap();
    assert_eq!(command.action, Action::Add);
    assert_eq!(command.patch.description.as_deref(), Some("买菜"));
    assert_eq!(command.patch.due_date.as_deref(), Some("2026-03-15"));
    assert_eq!(command.patch.all_day, None);
    assert_eq!(command.confidence, 0.87);
}

#[test]
fn models_load_once_per_directory_until_cleared() {
    let interpreter = interpreter(FakeLoader {
        action: "done",
        ..FakeLoader::default()
    });

    for _ in 0..3 {
        interpreter.interpret_with("完成 #4", &assembler()).unwrap();
    }
    let loader = interpreter.models().loader();
    assert_eq!(loader.intent_loads.load(Ordering::SeqCst), 1);
    assert_eq!(loader.slot_loads.load(Ordering::SeqCst), 1);
    assert_eq!(interpreter.models().len(), 2);

    interpreter.models().clear();
    assert!(interpreter.models().is_empty());
    interpreter.interpret_with("完成 #4", &assembler()).unwrap();
    assert_eq!(loader.intent_loads.load(Ordering::SeqCst), 2);
}

#[test]
fn distinct_directories_load_separately() {
    let interpreter = interpreter(FakeLoader {
        action: "add",
        ..FakeLoader::default()
    });
    let models = interpreter.models();

    let first = models.intent(&PathBuf::from("/models/a")).unwrap();
    let again = models.intent(&PathBuf::from("/models/a")).unwrap();
    models.intent(&PathBuf::from("/models/b")).unwrap();

    assert!(Arc::ptr_eq(&first, &again));
    assert_eq!(models.loader().intent_loads.load(Ordering::SeqCst), 2);
}

#[test]
fn failed_load_is_not_cached() {
    let interpreter = interpreter(FakeLoader {
        action: "update",
        failing_intent_loads: AtomicUsize::new(1),
        ..FakeLoader::default()
    });

    let err = interpreter.interpret_with("改 ID 2", &assembler()).unwrap_err();
    assert!(matches!(err, InterpretError::Model(ModelError::Load { .. })));
    assert!(interpreter.models().is_empty());

    let command = interpreter.interpret_with("改 ID 2", &assembler()).unwrap();
    assert_eq!(command.target.id, Some(2));
    assert_eq!(
        interpreter.models().loader().intent_loads.load(Ordering::SeqCst),
        2
    );
}

#[test]
fn unknown_action_is_an_error() {
    let interpreter = interpreter(FakeLoader {
        action: "archive",
        ..FakeLoader::default()
    });
    let err = interpreter.interpret_with("归档", &assembler()).unwrap_err();
    assert_eq!(err, InterpretError::UnknownAction("archive".to_string()));
}

#[test]
fn slot_contract_violation_fails_before_assembly() {
    let interpreter = interpreter(FakeLoader {
        action: "add",
        drop_last_prediction: true,
        ..FakeLoader::default()
    });
    let err = interpreter.interpret_with("买菜", &assembler()).unwrap_err();
    assert_eq!(
        err,
        InterpretError::Decode(DecodeError::LengthMismatch {
            offsets: 2,
            predictions: 1
        })
    );
}
