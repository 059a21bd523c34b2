use std::cell::RefCell;

use anyhow::Result;
use unveil_config::FormConfig;
use unveil_site::{
    ContactForm, Field, FormController, FormStatus, SubmitOutcome, SubmitResponse, Transport,
    TransportError,
};

/// Records every submission and answers with a canned reply.
struct FakeTransport {
    sent: RefCell<Vec<ContactForm>>,
    reply: Box<dyn Fn() -> Result<SubmitResponse, TransportError>>,
}

impl FakeTransport {
    fn replying(reply: impl Fn() -> Result<SubmitResponse, TransportError> + 'static) -> Self {
        Self {
            sent: RefCell::new(Vec::new()),
            reply: Box::new(reply),
        }
    }

    fn accepting() -> Self {
        Self::replying(|| {
            Ok(SubmitResponse {
                success: true,
                message: Some("Thanks!".into()),
                errors: Vec::new(),
            })
        })
    }

    fn sent(&self) -> usize {
        self.sent.borrow().len()
    }
}

impl Transport for FakeTransport {
    fn submit(&self, form: &ContactForm) -> Result<SubmitResponse, TransportError> {
        self.sent.borrow_mut().push(form.clone());
        (self.reply)()
    }
}

fn filled(controller: &mut FormController) {
    controller.set(Field::Name, "Grace Hopper");
    controller.set(Field::Email, "grace@example.com");
    controller.set(Field::CompanyName, "Compilers Inc");
    controller.set(Field::CompanySize, "51-200");
    controller.set(Field::Country, "United States");
    controller.set(Field::Message, "We are hiring in Portugal.");
}

#[test]
fn empty_email_is_caught_before_any_request() -> Result<()> {
    let transport = FakeTransport::accepting();
    let mut form = FormController::new(&FormConfig::default());
    filled(&mut form);
    form.set(Field::Email, "");

    assert_eq!(form.submit(&transport, 0.0), SubmitOutcome::Invalid);
    assert!(form.error(Field::Email).is_some());
    assert_eq!(form.errors().len(), 1);
    assert_eq!(transport.sent(), 0);

    form.set(Field::Email, "grace@example.com");
    assert!(form.error(Field::Email).is_none());
    Ok(())
}

#[test]
fn success_confirms_then_resets_after_timeout() -> Result<()> {
    let transport = FakeTransport::accepting();
    let mut form = FormController::new(&FormConfig::default());
    filled(&mut form);

    assert_eq!(form.submit(&transport, 1000.0), SubmitOutcome::Confirmed);
    assert_eq!(form.status(), FormStatus::Confirmed { until_ms: 6000.0 });
    assert_eq!(transport.sent(), 1);
    assert_eq!(transport.sent.borrow()[0].company_size, "51-200");

    assert_eq!(form.submit(&transport, 2000.0), SubmitOutcome::Ignored);
    assert_eq!(transport.sent(), 1);

    assert!(!form.tick(5999.0));
    assert!(form.tick(6000.0));
    assert_eq!(form.status(), FormStatus::Idle);
    assert_eq!(form.form(), &ContactForm::default());
    Ok(())
}

#[test]
fn server_errors_land_on_matching_fields() -> Result<()> {
    let transport = FakeTransport::replying(|| {
        Ok(SubmitResponse {
            success: false,
            message: None,
            errors: vec![
                "Company name is required".into(),
                "Email domain is not accepted".into(),
            ],
        })
    });
    let mut form = FormController::new(&FormConfig::default());
    filled(&mut form);

    assert_eq!(form.submit(&transport, 0.0), SubmitOutcome::Rejected);
    assert_eq!(form.error(Field::CompanyName), Some("Company name is required"));
    assert_eq!(form.error(Field::Email), Some("Email domain is not accepted"));
    assert!(form.error(Field::Name).is_none());
    assert!(form.alert().is_none());
    assert_eq!(form.status(), FormStatus::Failed);
    Ok(())
}

#[test]
fn unmatched_rejection_shows_support_alert() -> Result<()> {
    let transport = FakeTransport::replying(|| {
        Ok(SubmitResponse {
            success: false,
            message: Some("Too many requests.".into()),
            errors: vec!["Rate limit exceeded".into()],
        })
    });
    let config = FormConfig {
        support_email: "help@example.org".into(),
        ..FormConfig::default()
    };
    let mut form = FormController::new(&config);
    filled(&mut form);

    assert_eq!(form.submit(&transport, 0.0), SubmitOutcome::Rejected);
    let alert = form.alert().unwrap_or_default();
    assert!(alert.starts_with("Too many requests."));
    assert!(alert.contains("help@example.org"));
    Ok(())
}

#[test]
fn transport_failure_keeps_fields_and_alerts() -> Result<()> {
    let transport = FakeTransport::replying(|| Err(TransportError::Status { status: 503 }));
    let mut form = FormController::new(&FormConfig::default());
    filled(&mut form);

    assert_eq!(form.submit(&transport, 0.0), SubmitOutcome::Failed);
    assert!(form.alert().is_some_and(|a| a.contains("support@example.com")));
    assert_eq!(form.form().name, "Grace Hopper");
    assert!(!form.tick(100_000.0));
    Ok(())
}
