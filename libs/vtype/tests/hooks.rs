//! Custom destinations: derived hooks and closure callbacks.

use std::fmt;

use vtype::{
    BoxError, Callback, CallbackArg, Capability, ErrorKind, OnSet, OnSetBool, SequenceConfig,
    Setter, TextCodec, classify, convert, default_text, is_bool_like, render, render_with,
    type_name,
};

#[derive(Debug, Default, PartialEq, vtype::Value)]
#[vtype(text_codec)]
struct Hex(u32);

impl TextCodec for Hex {
    fn decode_text(&mut self, text: &[u8]) -> Result<(), BoxError> {
        let text = std::str::from_utf8(text)?;
        self.0 = u32::from_str_radix(text.trim_start_matches("0x"), 16)?;
        Ok(())
    }

    fn encode_text(&self) -> Result<Vec<u8>, BoxError> {
        Ok(format!("0x{:x}", self.0).into_bytes())
    }
}

#[derive(Debug, Default, PartialEq, vtype::Value)]
#[vtype(setter, name = "host:port")]
struct Endpoint {
    host: String,
    port: u16,
}

impl Setter for Endpoint {
    fn set(&mut self, raw: &str) -> Result<(), BoxError> {
        let (host, port) = raw.split_once(':').ok_or("missing port")?;
        self.port = port.parse()?;
        self.host = host.to_owned();
        Ok(())
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}

/// Declares both hooks; the codec must win.
#[derive(Debug, Default, vtype::Value)]
#[vtype(setter, text_codec)]
struct Both {
    via: &'static str,
}

impl TextCodec for Both {
    fn decode_text(&mut self, _text: &[u8]) -> Result<(), BoxError> {
        self.via = "codec";
        Ok(())
    }

    fn encode_text(&self) -> Result<Vec<u8>, BoxError> {
        Ok(b"codec".to_vec())
    }
}

impl Setter for Both {
    fn set(&mut self, _raw: &str) -> Result<(), BoxError> {
        self.via = "setter";
        Ok(())
    }
}

impl fmt::Display for Both {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("setter")
    }
}

#[derive(Debug, Default, Clone, PartialEq, vtype::Value)]
struct Plain {
    x: i32,
}

#[derive(Debug, Default, vtype::Value)]
#[vtype(text_codec, default_text = "masked")]
struct Secret(String);

impl Secret {
    fn masked(&self) -> String {
        "<hidden>".to_owned()
    }
}

impl TextCodec for Secret {
    fn decode_text(&mut self, text: &[u8]) -> Result<(), BoxError> {
        self.0 = String::from_utf8(text.to_vec())?;
        Ok(())
    }

    fn encode_text(&self) -> Result<Vec<u8>, BoxError> {
        Ok(self.0.clone().into_bytes())
    }
}

#[derive(Debug, Default, vtype::Value)]
#[vtype(text_codec)]
struct Binary;

impl TextCodec for Binary {
    fn decode_text(&mut self, _text: &[u8]) -> Result<(), BoxError> {
        Ok(())
    }

    fn encode_text(&self) -> Result<Vec<u8>, BoxError> {
        Ok(vec![0xff, 0xfe])
    }
}

#[derive(Debug, Default, vtype::Value)]
#[vtype(callback)]
struct Counter {
    hits: usize,
}

impl Callback for Counter {
    fn is_bool(&self) -> bool {
        false
    }

    fn call(&mut self, arg: CallbackArg<'_>) -> Result<(), BoxError> {
        match arg {
            CallbackArg::Text("") => Err("empty".into()),
            _ => {
                self.hits += 1;
                Ok(())
            }
        }
    }
}

#[test]
fn text_codec() {
    let mut h: Option<Hex> = None;
    convert(&mut h, "0xff").unwrap();
    assert_eq!(h, Some(Hex(255)));
    assert_eq!(render(&h).unwrap(), "0xff");
    assert_eq!(type_name(&h), "value");
    assert_eq!(classify(&Hex(1)), Capability::TextCodec);

    let err = convert(&mut h, "zz").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Codec);
    assert_eq!(err.type_name(), "Hex");
    assert_eq!(h, Some(Hex(255)));
}

#[test]
fn setter() {
    let mut e = Endpoint::default();
    convert(&mut e, "localhost:8080").unwrap();
    assert_eq!(render(&e).unwrap(), "localhost:8080");
    assert_eq!(type_name(&e), "host:port");

    let err = convert(&mut e, "localhost").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Setter);
    assert!(err.to_string().contains("missing port"), "{err}");
}

#[test]
fn text_codec_outranks_setter() {
    let mut both = Both::default();
    convert(&mut both, "anything").unwrap();
    assert_eq!(both.via, "codec");
    assert_eq!(render(&both).unwrap(), "codec");
    assert_eq!(classify(&both), Capability::TextCodec);
}

#[test]
fn unsupported_type_is_untouched() {
    let mut plain = Plain { x: 7 };
    let err = convert(&mut plain, "1").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Unsupported);
    assert_eq!(err.type_name(), "Plain");
    assert_eq!(plain, Plain { x: 7 });

    let mut vacant: Option<Plain> = None;
    assert!(convert(&mut vacant, "1").is_err());
    assert_eq!(vacant, None);

    assert!(render(&plain).is_err());
    assert_eq!(default_text(&plain), "");
    assert_eq!(type_name(&plain), "Plain");
}

#[test]
fn default_text_override() {
    let mut secret = Secret::default();
    convert(&mut secret, "hunter2").unwrap();
    assert_eq!(render(&secret).unwrap(), "hunter2");
    assert_eq!(default_text(&secret), "<hidden>");
}

#[test]
fn non_utf8_encoding_is_a_codec_failure() {
    let err = render(&Binary).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Codec);
    assert!(default_text(&Binary).contains("text codec"));
}

#[test]
fn derived_callback_materializes_behind_empty_layer() {
    let mut counter: Option<Box<Counter>> = None;
    convert(&mut counter, "go").unwrap();
    convert(&mut counter, "again").unwrap();
    assert_eq!(counter.as_ref().map(|c| c.hits), Some(2));

    let err = convert(&mut counter, "").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Callback);
    assert_eq!(render(&counter).unwrap(), "");
}

#[test]
fn on_set_receives_raw_text() {
    let mut seen = Vec::new();
    let mut hook = OnSet::new(|raw: &str| {
        seen.push(raw.to_owned());
        Ok(())
    });
    convert(&mut hook, "a").unwrap();
    convert(&mut hook, "").unwrap();
    assert_eq!(type_name(&hook), "value");
    assert!(!is_bool_like(&hook));
    assert_eq!(render(&hook).unwrap(), "");
    drop(hook);
    assert_eq!(seen, ["a", ""]);
}

#[test]
fn on_set_failure_is_a_callback_failure() {
    let mut hook = OnSet::new(|raw: &str| -> Result<(), BoxError> {
        Err(format!("rejected {raw}").into())
    });
    let err = convert(&mut hook, "x").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Callback);
    assert!(err.to_string().ends_with("callback: rejected x"), "{err}");
}

#[test]
fn on_set_bool_parses_before_calling() {
    let mut got = Vec::new();
    let mut hook = OnSetBool::new(|b| {
        got.push(b);
        Ok(())
    });
    convert(&mut hook, "t").unwrap();
    convert(&mut hook, "FALSE").unwrap();

    let err = convert(&mut hook, "maybe").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Parse);

    assert_eq!(type_name(&hook), "bool");
    assert!(is_bool_like(&hook));
    drop(hook);
    assert_eq!(got, [true, false]);
}

#[test]
fn sequence_of_custom_elements() {
    let mut values: Vec<Hex> = Vec::new();
    let config = SequenceConfig::default().split_each();
    let mut binding = vtype::Binding::with_config(&mut values, config.clone());
    binding.convert("0x1,0xa").unwrap();
    assert_eq!(binding.type_name(), "value(multisep:,)");
    assert_eq!(render_with(&values, &config).unwrap(), "0x1,0xa");
    assert_eq!(values, [Hex(1), Hex(10)]);
}
